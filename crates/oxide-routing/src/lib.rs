//! # oxide-routing
//!
//! Template routing, reverse URL generation and controller dispatch.
//!
//! This crate provides:
//! - Route templates with `:name` placeholders, matched in declaration order
//! - Convention routing (`/controller/action/params...`) when no route matches
//! - Prefixes (`/admin/...` calling `admin_<action>`)
//! - Reverse URL generation from a route name or from routing keys
//! - Controllers with `before_action`/`after_action` hooks and action tables
//!
//! ## Quick Start
//!
//! ```
//! use oxide_routing::{
//!     ActionResult, Actions, Controller, Dispatcher, HttpWriter, Params, Request, Response,
//!     Router,
//! };
//!
//! struct PostsController;
//!
//! impl PostsController {
//!     fn show(&mut self, args: &[String]) -> ActionResult {
//!         Some(Response::text(format!("Post #{}", args[0])))
//!     }
//! }
//!
//! impl Controller for PostsController {
//!     fn new(_request: &Request) -> Self {
//!         Self
//!     }
//!
//!     fn actions() -> Actions<Self> {
//!         Actions::new().action("show", Self::show)
//!     }
//! }
//!
//! let mut router = Router::new();
//! router
//!     .get("posts/:id", Params::new().controller("posts").action("show"))
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::new().register::<PostsController>("posts");
//!
//! let mut request = Request::get("/posts/42");
//! let mut out = HttpWriter::new(Vec::new());
//! dispatcher.handle(&router, &mut request, &mut out).unwrap();
//! ```
//!
//! ## Templates
//!
//! A placeholder is a colon followed by letters and digits. It matches one
//! path segment and is captured both by name and by position:
//!
//! ```
//! use oxide_routing::{Params, Request, Router};
//!
//! let mut router = Router::new();
//! router
//!     .connect("posts/:post/comments/:comment", Params::new().controller("comments"))
//!     .unwrap();
//!
//! let mut request = Request::get("/posts/3/comments/9");
//! router.parse(&mut request).unwrap();
//! assert_eq!(request.params.get("comment"), Some("9"));
//! assert_eq!(request.parameters, vec!["3", "9"]);
//! ```
//!
//! ## Dynamic data
//!
//! A registration value that is itself a placeholder is read from the URL:
//!
//! ```
//! use oxide_routing::{Params, Request, Router};
//!
//! let mut router = Router::new();
//! router
//!     .connect("docs/:page", Params::new().controller("docs").action(":page"))
//!     .unwrap();
//!
//! let mut request = Request::get("/docs/install");
//! router.parse(&mut request).unwrap();
//! assert_eq!(request.action, "install");
//! assert!(request.parameters.is_empty());
//! ```
//!
//! ## Prefixes and URLs
//!
//! ```
//! use oxide_routing::{Params, Router};
//!
//! let mut router = Router::new();
//! router.prefix("admin", "admin");
//! router
//!     .connect("posts/:id", Params::new().controller("posts").action("edit").prefix("admin"))
//!     .unwrap();
//!
//! let params = Params::new().controller("posts").action("edit").set("id", "5");
//! assert_eq!(router.url(&params, false).unwrap(), "/admin/posts/5");
//! ```

mod config;
mod controller;
mod dispatcher;
mod error;
mod params;
pub mod path;
mod request;
mod response;
mod route;
mod router;

pub use config::{AppConfig, Config, PrefixConfig, RouteConfig};
pub use controller::{ActionFn, ActionResult, Actions, Controller};
pub use dispatcher::Dispatcher;
pub use error::{Result, RouterError};
pub use params::Params;
pub use path::RoutePattern;
pub use request::{Method, MethodFilter, PathParams, Request};
pub use response::{HttpWriter, Response, Transport};
pub use route::{Route, short_controller_name};
pub use router::{DEFAULT_ACTION, Router, UrlTarget};
