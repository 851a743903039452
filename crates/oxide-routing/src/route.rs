//! The route entity.

use crate::params::{self, Params};
use crate::path::{RoutePattern, trim_slashes};
use crate::request::{MethodFilter, Request};

/// Reduces a controller identifier to its short form.
///
/// Fully-qualified names lose their namespace and their `Controller`
/// suffix; short names pass through untouched.
///
/// ```
/// use oxide_routing::short_controller_name;
///
/// assert_eq!(short_controller_name("App\\Controller\\PostsController"), "Posts");
/// assert_eq!(short_controller_name("app::controller::UsersController"), "Users");
/// assert_eq!(short_controller_name("posts"), "posts");
/// ```
pub fn short_controller_name(controller: &str) -> &str {
    let Some(last) = controller.rsplit(['\\', ':']).next() else {
        return controller;
    };
    if last.len() == controller.len() {
        return controller;
    }
    let cut = last.len().saturating_sub("controller".len());
    match last.get(cut..) {
        Some(tail) if cut > 0 && tail.eq_ignore_ascii_case("controller") => &last[..cut],
        _ => last,
    }
}

/// One template-to-controller mapping, built by
/// [`Router::connect`](crate::Router::connect).
#[derive(Debug, Clone)]
pub struct Route {
    pub(crate) name: String,
    /// The template as declared, without the prefix segment.
    pub(crate) template: RoutePattern,
    /// The matcher, prefix segment included.
    pub(crate) pattern: RoutePattern,
    pub(crate) controller: String,
    pub(crate) action: String,
    pub(crate) method: MethodFilter,
    pub(crate) prefix: Option<String>,
    pub(crate) plugin: Option<String>,
    /// Request attribute name to placeholder name, for parameters whose
    /// value is taken from the URL.
    pub(crate) dynamic: Vec<(String, String)>,
}

impl Route {
    /// Route name, explicit or generated.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared template without surrounding slashes or prefix.
    pub fn template(&self) -> &str {
        self.template.template()
    }

    /// Full matched template, prefix segment included.
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// Short controller name.
    pub fn controller(&self) -> &str {
        &self.controller
    }

    /// Action name.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Accepted methods.
    pub fn method(&self) -> MethodFilter {
        self.method
    }

    /// Prefix identifier.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Plugin tag.
    pub fn plugin(&self) -> Option<&str> {
        self.plugin.as_deref()
    }

    /// Attributes resolved from URL segments, as `(attribute, placeholder)`.
    pub fn dynamic_data(&self) -> &[(String, String)] {
        &self.dynamic
    }

    /// Returns true if every routing key present in `candidate` agrees with
    /// this route. Controller names compare by short form, ignoring case.
    pub fn equals(&self, candidate: &Params) -> bool {
        let controller_ok = candidate.get(params::CONTROLLER).map_or(true, |c| {
            short_controller_name(c).eq_ignore_ascii_case(&self.controller)
        });
        let action_ok = candidate
            .get(params::ACTION)
            .map_or(true, |a| a == self.action);
        let prefix_ok = candidate
            .get(params::PREFIX)
            .map_or(true, |p| Some(p) == self.prefix.as_deref());
        let plugin_ok = candidate
            .get(params::PLUGIN)
            .map_or(true, |p| Some(p) == self.plugin.as_deref());

        controller_ok && action_ok && prefix_ok && plugin_ok
    }

    /// Returns true if the request's method passes the filter and its path
    /// fully matches the compiled pattern.
    pub fn matches(&self, request: &Request) -> bool {
        self.captures(request).is_some()
    }

    /// Captured values in placeholder order, if the request matches.
    pub(crate) fn captures(&self, request: &Request) -> Option<Vec<String>> {
        if !self.method.accepts(request.method) {
            return None;
        }
        self.pattern.captures(trim_slashes(&request.path))
    }
}
