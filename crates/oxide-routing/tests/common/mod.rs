#![allow(dead_code)]

use std::cell::RefCell;

use oxide_routing::{
    ActionResult, Actions, Controller, Dispatcher, Params, Request, Response, Router, Transport,
};

thread_local! {
    static EVENTS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Records a lifecycle event for the current test thread.
pub fn record(event: impl Into<String>) {
    EVENTS.with(|events| events.borrow_mut().push(event.into()));
}

/// Takes the events recorded so far on this thread.
pub fn take_events() -> Vec<String> {
    EVENTS.with(|events| events.borrow_mut().drain(..).collect())
}

/// A transport that keeps every response it is asked to send.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub sent: Vec<Response>,
}

impl Transport for RecordingTransport {
    fn send(&mut self, response: &Response) -> std::io::Result<()> {
        record("send");
        self.sent.push(response.clone());
        Ok(())
    }
}

/// A transport whose connection is gone.
pub struct ClosedTransport;

impl Transport for ClosedTransport {
    fn send(&mut self, _response: &Response) -> std::io::Result<()> {
        Err(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "client went away",
        ))
    }
}

pub struct PostsController;

impl PostsController {
    fn index(&mut self, _args: &[String]) -> ActionResult {
        record("index");
        Some(Response::text("posts"))
    }

    fn show(&mut self, args: &[String]) -> ActionResult {
        record("show");
        Some(Response::text(format!("post {}", args.join("/"))))
    }

    fn admin_index(&mut self, _args: &[String]) -> ActionResult {
        record("admin_index");
        Some(Response::text("admin posts"))
    }

    fn forgetful(&mut self, _args: &[String]) -> ActionResult {
        record("forgetful");
        None
    }
}

impl Controller for PostsController {
    fn new(request: &Request) -> Self {
        record(format!("new {}", request.path));
        Self
    }

    fn actions() -> Actions<Self> {
        Actions::new()
            .action("index", Self::index)
            .action("show", Self::show)
            .action("admin_index", Self::admin_index)
            .action("forgetful", Self::forgetful)
    }

    fn before_action(&mut self) {
        record("before");
    }

    fn after_action(&mut self) {
        record("after");
    }
}

pub struct PagesController;

impl PagesController {
    fn home(&mut self, _args: &[String]) -> ActionResult {
        Some(Response::html("<h1>Home</h1>"))
    }
}

impl Controller for PagesController {
    fn new(_request: &Request) -> Self {
        Self
    }

    fn actions() -> Actions<Self> {
        Actions::new().action("home", Self::home)
    }
}

/// A router with a home page, a post page, an admin area and a catch-all
/// for documentation pages.
pub fn blog_router() -> Router {
    let mut router = Router::new().with_base_url("https://blog.example");
    router.prefix("admin", "admin");
    router
        .connect(
            "/",
            Params::new().controller("pages").action("home").name("home"),
        )
        .expect("home route");
    router
        .get(
            "posts/:id",
            Params::new()
                .controller("App\\Controller\\PostsController")
                .action("show")
                .name("post"),
        )
        .expect("post route");
    router
        .connect(
            "posts",
            Params::new()
                .controller("posts")
                .prefix("admin")
                .name("admin_posts"),
        )
        .expect("admin route");
    router
        .connect(
            "docs/:section/:page",
            Params::new()
                .controller("docs")
                .action(":page")
                .plugin("manual"),
        )
        .expect("docs route");
    router
}

pub fn blog_dispatcher() -> Dispatcher {
    Dispatcher::new()
        .register::<PostsController>("posts")
        .register::<PagesController>("App\\Controller\\PagesController")
}

pub fn parsed(router: &Router, request: Request) -> Request {
    let mut request = request;
    router
        .parse(&mut request)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {e}", request.path));
    request
}
