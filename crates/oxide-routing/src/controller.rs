//! Controllers and their action tables.

use std::collections::BTreeMap;
use std::fmt;

use crate::request::Request;
use crate::response::Response;

/// What an action hands back. `None` means the action produced nothing to
/// send, which the dispatcher rejects.
pub type ActionResult = Option<Response>;

/// An action: a controller method taking the request's positional
/// parameters in URL order.
pub type ActionFn<C> = fn(&mut C, &[String]) -> ActionResult;

/// Action name to function, built once per controller type.
pub struct Actions<C> {
    table: BTreeMap<String, ActionFn<C>>,
}

impl<C> Actions<C> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            table: BTreeMap::new(),
        }
    }

    /// Adds an action.
    #[must_use]
    pub fn action(mut self, name: impl Into<String>, action: ActionFn<C>) -> Self {
        self.table.insert(name.into(), action);
        self
    }

    /// Looks up an action.
    pub fn get(&self, name: &str) -> Option<ActionFn<C>> {
        self.table.get(name).copied()
    }

    /// Returns true if the action exists.
    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Action names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }
}

impl<C> Default for Actions<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Actions<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.table.keys()).finish()
    }
}

/// A request handler with lifecycle hooks around each action.
///
/// # Example
///
/// ```
/// use oxide_routing::{ActionResult, Actions, Controller, Request, Response};
///
/// struct PostsController;
///
/// impl PostsController {
///     fn show(&mut self, args: &[String]) -> ActionResult {
///         Some(Response::text(format!("post {}", args[0])))
///     }
///
///     fn admin_index(&mut self, _args: &[String]) -> ActionResult {
///         Some(Response::text("all posts"))
///     }
/// }
///
/// impl Controller for PostsController {
///     fn new(_request: &Request) -> Self {
///         Self
///     }
///
///     fn actions() -> Actions<Self> {
///         Actions::new()
///             .action("show", Self::show)
///             .action("admin_index", Self::admin_index)
///     }
/// }
/// ```
pub trait Controller: Sized + 'static {
    /// Builds the controller for one request.
    fn new(request: &Request) -> Self;

    /// The actions this controller exposes. Prefixed actions are listed
    /// under their full name, such as `admin_index`.
    fn actions() -> Actions<Self>;

    /// Runs before every action.
    fn before_action(&mut self) {}

    /// Runs after every action that returned a response.
    fn after_action(&mut self) {}
}
