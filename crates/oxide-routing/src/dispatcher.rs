//! Dispatching parsed requests to controllers.

use std::collections::BTreeMap;

use tracing::debug;

use crate::controller::{Actions, Controller};
use crate::error::{Result, RouterError};
use crate::request::Request;
use crate::response::{Response, Transport};
use crate::route::short_controller_name;
use crate::router::Router;

/// Type-erased view of a registered controller type.
trait Handler: Send + Sync {
    fn invoke(&self, request: &Request, action: &str) -> Result<Response>;

    fn action_names(&self) -> Vec<&str>;
}

struct Registered<C: Controller> {
    name: String,
    actions: Actions<C>,
}

impl<C: Controller> Handler for Registered<C> {
    fn invoke(&self, request: &Request, action: &str) -> Result<Response> {
        let mut controller = C::new(request);

        let run = self.actions.get(action).ok_or_else(|| {
            RouterError::NotFound(format!(
                "the controller '{}' has no action '{action}'",
                self.name
            ))
        })?;

        controller.before_action();
        let response = run(&mut controller, &request.parameters).ok_or_else(|| {
            RouterError::DispatchContractViolation(format!(
                "'{}::{action}' returned no response; every action must return one",
                self.name
            ))
        })?;
        controller.after_action();

        Ok(response)
    }

    fn action_names(&self) -> Vec<&str> {
        self.actions.names().collect()
    }
}

/// Registry key for a controller identifier: the short name, lower-cased.
fn controller_key(controller: &str) -> String {
    short_controller_name(controller).to_ascii_lowercase()
}

/// Runs parsed requests against the registered controllers.
///
/// Controllers are registered once at startup under their short name. The
/// name may be given fully qualified (`App\Controller\PostsController`) and
/// lookups ignore case, so a request for `posts` finds `Posts`.
///
/// ```
/// use oxide_routing::{
///     ActionResult, Actions, Controller, Dispatcher, HttpWriter, Request, Response, Router,
/// };
///
/// struct PagesController;
///
/// impl PagesController {
///     fn index(&mut self, _args: &[String]) -> ActionResult {
///         Some(Response::text("welcome"))
///     }
/// }
///
/// impl Controller for PagesController {
///     fn new(_request: &Request) -> Self {
///         Self
///     }
///
///     fn actions() -> Actions<Self> {
///         Actions::new().action("index", Self::index)
///     }
/// }
///
/// let router = Router::new();
/// let dispatcher = Dispatcher::new().register::<PagesController>("pages");
///
/// let mut out = HttpWriter::new(Vec::new());
/// let mut request = Request::get("/pages");
/// dispatcher.handle(&router, &mut request, &mut out).unwrap();
/// assert!(String::from_utf8(out.into_inner()).unwrap().ends_with("welcome"));
/// ```
#[derive(Default)]
pub struct Dispatcher {
    handlers: BTreeMap<String, Box<dyn Handler>>,
}

impl Dispatcher {
    /// Creates a dispatcher with no controllers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers controller type `C` under `name`.
    #[must_use]
    pub fn register<C: Controller>(mut self, name: &str) -> Self {
        let key = controller_key(name);
        let handler = Registered::<C> {
            name: short_controller_name(name).to_string(),
            actions: C::actions(),
        };
        debug!(controller = %key, actions = ?handler.action_names(), "registered controller");
        self.handlers.insert(key, Box::new(handler));
        self
    }

    /// Returns true if a controller answers to `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(&controller_key(name))
    }

    /// Registered controller keys with their action names.
    pub fn controllers(&self) -> impl Iterator<Item = (&str, Vec<&str>)> {
        self.handlers
            .iter()
            .map(|(key, handler)| (key.as_str(), handler.action_names()))
    }

    /// Runs the action the request was resolved to and sends its response.
    ///
    /// The controller is built for this request, then `before_action`, the
    /// action and `after_action` run in that order. An action that returns
    /// no response fails the dispatch and nothing is sent.
    pub fn dispatch(&self, request: &Request, transport: &mut dyn Transport) -> Result<()> {
        let handler = self
            .handlers
            .get(&controller_key(&request.controller))
            .ok_or_else(|| {
                RouterError::NotFound(format!(
                    "the controller '{}' has not been registered",
                    request.controller
                ))
            })?;

        let action = request.effective_action();
        debug!(
            controller = %request.controller,
            action = %action,
            parameters = ?request.parameters,
            "dispatching"
        );

        handler.invoke(request, &action)?.send(transport)
    }

    /// Parses the request with `router`, then dispatches it.
    pub fn handle(
        &self,
        router: &Router,
        request: &mut Request,
        transport: &mut dyn Transport,
    ) -> Result<()> {
        router.parse(request)?;
        self.dispatch(request, transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ActionResult;

    struct Recorder(Vec<Response>);

    impl Transport for Recorder {
        fn send(&mut self, response: &Response) -> std::io::Result<()> {
            self.0.push(response.clone());
            Ok(())
        }
    }

    struct PostsController {
        path: String,
    }

    impl PostsController {
        fn show(&mut self, args: &[String]) -> ActionResult {
            Some(Response::text(format!("{} -> {}", self.path, args.join(","))))
        }

        fn broken(&mut self, _args: &[String]) -> ActionResult {
            None
        }
    }

    impl Controller for PostsController {
        fn new(request: &Request) -> Self {
            Self {
                path: request.path.clone(),
            }
        }

        fn actions() -> Actions<Self> {
            Actions::new()
                .action("show", Self::show)
                .action("broken", Self::broken)
        }
    }

    fn request(controller: &str, action: &str, parameters: &[&str]) -> Request {
        let mut request = Request::get("/x");
        request.controller = controller.to_string();
        request.action = action.to_string();
        request.parameters = parameters.iter().map(|p| (*p).to_string()).collect();
        request
    }

    #[test]
    fn test_register_normalizes_names() {
        let dispatcher =
            Dispatcher::new().register::<PostsController>("App\\Controller\\PostsController");
        assert!(dispatcher.contains("posts"));
        assert!(dispatcher.contains("Posts"));
        assert!(!dispatcher.contains("users"));
    }

    #[test]
    fn test_dispatch_spreads_parameters() {
        let dispatcher = Dispatcher::new().register::<PostsController>("posts");
        let mut out = Recorder(Vec::new());

        dispatcher
            .dispatch(&request("posts", "show", &["4", "draft"]), &mut out)
            .unwrap();
        assert_eq!(out.0.len(), 1);
        assert_eq!(out.0[0].body_string(), Some("/x -> 4,draft".to_string()));
    }

    #[test]
    fn test_unknown_controller() {
        let dispatcher = Dispatcher::new();
        let err = dispatcher
            .dispatch(&request("posts", "show", &[]), &mut Recorder(Vec::new()))
            .unwrap_err();
        assert!(matches!(err, RouterError::NotFound(_)));
    }

    #[test]
    fn test_unknown_action() {
        let dispatcher = Dispatcher::new().register::<PostsController>("posts");
        let err = dispatcher
            .dispatch(&request("posts", "edit", &[]), &mut Recorder(Vec::new()))
            .unwrap_err();
        assert!(matches!(err, RouterError::NotFound(_)));
    }

    #[test]
    fn test_empty_result_is_not_sent() {
        let dispatcher = Dispatcher::new().register::<PostsController>("posts");
        let mut out = Recorder(Vec::new());
        let err = dispatcher
            .dispatch(&request("posts", "broken", &[]), &mut out)
            .unwrap_err();
        assert!(matches!(err, RouterError::DispatchContractViolation(_)));
        assert!(out.0.is_empty());
    }
}
