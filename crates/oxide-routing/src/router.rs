//! Route registry, request resolution and reverse URL generation.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::error::{Result, RouterError};
use crate::params::{self, Params};
use crate::path::{RoutePattern, placeholder_reference, trim_slashes};
use crate::request::{MethodFilter, Request};
use crate::route::{Route, short_controller_name};

/// Action used when a route or URL names none.
pub const DEFAULT_ACTION: &str = "index";

/// What to build a URL from.
#[derive(Debug, Clone, Copy)]
pub enum UrlTarget<'a> {
    /// A named route. The template is returned with its placeholders intact.
    Name(&'a str),
    /// Routing keys plus placeholder values.
    Params(&'a Params),
}

impl<'a> From<&'a str> for UrlTarget<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for UrlTarget<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a Params> for UrlTarget<'a> {
    fn from(params: &'a Params) -> Self {
        Self::Params(params)
    }
}

/// The routing table.
///
/// Registration (`prefix`, `connect`) needs `&mut self`; resolution and URL
/// generation only borrow, so a built router can be shared behind an `Arc`
/// by every worker.
///
/// ```
/// use oxide_routing::{Params, Request, Router};
///
/// let mut router = Router::new();
/// router.connect("posts/:id", Params::new().controller("posts").action("show")).unwrap();
///
/// let mut request = Request::get("/posts/42");
/// router.parse(&mut request).unwrap();
/// assert_eq!(request.controller, "posts");
/// assert_eq!(request.action, "show");
/// assert_eq!(request.params.get("id"), Some("42"));
/// assert_eq!(request.parameters, vec!["42"]);
/// ```
#[derive(Debug, Clone)]
pub struct Router {
    /// Routes in match order.
    routes: Vec<Route>,
    /// Route name to position in `routes`.
    names: HashMap<String, usize>,
    /// Prefix identifier to URL key.
    prefixes: BTreeMap<String, String>,
    /// Base URL used for full URLs.
    base_url: String,
    /// Counter for generated route names.
    next_id: u64,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Creates a new empty router.
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            names: HashMap::new(),
            prefixes: BTreeMap::from([(String::new(), String::new())]),
            base_url: String::new(),
            next_id: 0,
        }
    }

    /// Sets the base URL prepended to full URLs.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Declares `url_key` as the path segment(s) that activate `prefix`.
    ///
    /// Routes connected under the prefix get the key prepended to their
    /// template, and their actions resolve to `<prefix>_<action>`.
    /// Registering a prefix again replaces its key.
    pub fn prefix(&mut self, url_key: &str, prefix: &str) -> &mut Self {
        let url_key = trim_slashes(url_key);
        debug!(prefix, url_key, "registered prefix");
        self.prefixes.insert(prefix.to_string(), url_key.to_string());
        self
    }

    /// Iterates over `(prefix, url_key)` pairs, the empty prefix included.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, k)| (p.as_str(), k.as_str()))
    }

    /// Compiles `template` into a route and registers it.
    ///
    /// Recognised keys in `parameters`: `controller` (required), `action`
    /// (default `index`), `method` (default any), `prefix` (must have been
    /// declared with [`Router::prefix`]), `plugin` and `name` (default a
    /// generated `route_<n>`). A value that is a whole placeholder reference
    /// such as `:controller` is read from the matching URL segment.
    ///
    /// A route registered under an existing name replaces the earlier one
    /// in place, keeping its match position.
    pub fn connect(&mut self, template: &str, parameters: Params) -> Result<&Route> {
        let template = RoutePattern::new(template)?;

        let prefix = parameters.get(params::PREFIX).map(str::to_string);
        let pattern = match prefix.as_deref() {
            Some(prefix) => {
                let url_key = self.prefixes.get(prefix).ok_or_else(|| {
                    RouterError::BadRouteDefinition(format!(
                        "the route '{}' uses the prefix '{prefix}' which has not been declared",
                        template.template()
                    ))
                })?;
                RoutePattern::new(&format!("{url_key}/{}", template.template()))?
            }
            None => template.clone(),
        };

        let controller = parameters.get(params::CONTROLLER).ok_or_else(|| {
            RouterError::BadRouteDefinition(format!(
                "the controller is missing from the parameters of '{}'",
                template.template()
            ))
        })?;
        let controller = if placeholder_reference(controller).is_some() {
            controller.to_string()
        } else {
            short_controller_name(controller).to_string()
        };

        let action = parameters
            .get(params::ACTION)
            .unwrap_or(DEFAULT_ACTION)
            .to_string();

        let method = match parameters.get(params::METHOD) {
            Some(method) => method.parse::<MethodFilter>().map_err(|e| {
                RouterError::BadRouteDefinition(format!("{e} in '{}'", template.template()))
            })?,
            None => MethodFilter::Any,
        };

        let mut dynamic = Vec::new();
        for (key, value) in parameters.iter() {
            if key == params::NAME || key == params::METHOD {
                continue;
            }
            let Some(placeholder) = placeholder_reference(value) else {
                continue;
            };
            if pattern.index_of(placeholder).is_none() {
                return Err(RouterError::BadRouteDefinition(format!(
                    "'{key}' refers to ':{placeholder}' which '{}' does not declare",
                    pattern.template()
                )));
            }
            dynamic.push((key.to_string(), placeholder.to_string()));
        }

        let name = match parameters.get(params::NAME) {
            Some(name) => name.to_string(),
            None => self.generate_name(),
        };

        let route = Route {
            name: name.clone(),
            template,
            pattern,
            controller,
            action,
            method,
            prefix,
            plugin: parameters.get(params::PLUGIN).map(str::to_string),
            dynamic,
        };

        debug!(
            name = %route.name,
            pattern = %route.pattern.template(),
            controller = %route.controller,
            action = %route.action,
            method = %route.method,
            "connected route"
        );

        let index = match self.names.get(&name) {
            Some(&index) => {
                warn!(name = %name, "route name already registered, replacing it");
                self.routes[index] = route;
                index
            }
            None => {
                self.routes.push(route);
                let index = self.routes.len() - 1;
                self.names.insert(name, index);
                index
            }
        };

        Ok(&self.routes[index])
    }

    /// Connects a route that only answers GET requests.
    pub fn get(&mut self, template: &str, parameters: Params) -> Result<&Route> {
        self.connect(template, parameters.method("GET"))
    }

    /// Connects a route that only answers POST requests.
    pub fn post(&mut self, template: &str, parameters: Params) -> Result<&Route> {
        self.connect(template, parameters.method("POST"))
    }

    /// Iterates over the routes in match order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// Looks up a route by name.
    pub fn route(&self, name: &str) -> Option<&Route> {
        self.names.get(name).map(|&index| &self.routes[index])
    }

    /// Resolves the request in place.
    ///
    /// The first connected route that matches wins. Without one the path is
    /// read by convention: `[prefix key/]controller[/action[/params...]]`,
    /// the action defaulting to `index`.
    pub fn parse(&self, request: &mut Request) -> Result<()> {
        request.reset_routing();
        let path = trim_slashes(&request.path).to_string();

        for route in &self.routes {
            let Some(captures) = route.captures(request) else {
                continue;
            };

            request.plugin.clone_from(&route.plugin);
            request.prefix.clone_from(&route.prefix);
            request.controller.clone_from(&route.controller);
            request.action.clone_from(&route.action);

            let mut consumed = vec![false; captures.len()];
            for (attribute, placeholder) in &route.dynamic {
                if let Some(index) = route.pattern.index_of(placeholder) {
                    consumed[index] = true;
                    assign_attribute(request, attribute, captures[index].clone());
                }
            }

            let mut parameters = Vec::with_capacity(captures.len());
            for ((name, value), consumed) in route
                .pattern
                .placeholders()
                .iter()
                .zip(captures)
                .zip(consumed)
            {
                if !consumed {
                    request.params.insert(name.clone(), value.clone());
                    parameters.push(value);
                }
            }
            request.parameters = parameters;
            request.path = format!("/{path}");

            debug!(
                route = %route.name,
                controller = %request.controller,
                action = %request.action,
                "matched route"
            );
            return Ok(());
        }

        self.parse_by_convention(request, &path)
    }

    fn parse_by_convention(&self, request: &mut Request, path: &str) -> Result<()> {
        let mut segments: Vec<&str> = path.split('/').collect();

        if let Some((prefix, key_len)) = self.prefix_for(&segments) {
            request.prefix = Some(prefix.to_string());
            segments.drain(..key_len);
        }

        let controller = segments
            .first()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                RouterError::NotFound(format!("'/{path}' is not connected to any route"))
            })?;
        request.controller = (*controller).to_string();
        request.action = segments
            .get(1)
            .filter(|s| !s.is_empty())
            .map_or(DEFAULT_ACTION, |s| *s)
            .to_string();
        request.parameters = segments
            .iter()
            .skip(2)
            .map(|s| (*s).to_string())
            .collect();
        request.path = format!("/{path}");

        debug!(
            controller = %request.controller,
            action = %request.action,
            prefix = ?request.prefix,
            "resolved by convention"
        );
        Ok(())
    }

    /// The prefix whose URL key opens the path, longest key first.
    fn prefix_for(&self, segments: &[&str]) -> Option<(&str, usize)> {
        self.prefixes
            .iter()
            .filter(|(_, key)| !key.is_empty())
            .filter_map(|(prefix, key)| {
                let key_segments: Vec<&str> = key.split('/').collect();
                segments
                    .starts_with(&key_segments)
                    .then_some((prefix.as_str(), key_segments.len()))
            })
            .max_by_key(|(_, len)| *len)
    }

    /// Generates a URL for a named route or a parameter set.
    ///
    /// With `full` the configured base URL is prepended.
    ///
    /// ```
    /// use oxide_routing::{Params, Router};
    ///
    /// let mut router = Router::new().with_base_url("https://example.com");
    /// router.connect("posts/:id", Params::new().controller("posts").action("show")).unwrap();
    ///
    /// let params = Params::new().controller("posts").action("show").set("id", "42");
    /// assert_eq!(router.url(&params, false).unwrap(), "/posts/42");
    /// assert_eq!(router.url(&params, true).unwrap(), "https://example.com/posts/42");
    /// ```
    pub fn url<'a>(&self, target: impl Into<UrlTarget<'a>>, full: bool) -> Result<String> {
        self.generate(target.into(), full, None)
    }

    /// Like [`Router::url`], but a parameter set without a controller takes
    /// the controller of `current`, typically the request being served.
    pub fn url_with_fallback<'a>(
        &self,
        target: impl Into<UrlTarget<'a>>,
        full: bool,
        current: &Request,
    ) -> Result<String> {
        self.generate(target.into(), full, Some(current))
    }

    fn generate(
        &self,
        target: UrlTarget<'_>,
        full: bool,
        current: Option<&Request>,
    ) -> Result<String> {
        let path = match target {
            UrlTarget::Name(name) => self.url_from_name(name)?,
            UrlTarget::Params(parameters) => self.url_from_params(parameters, current)?,
        };

        if full {
            Ok(format!("{}{path}", self.base_url.trim_end_matches('/')))
        } else {
            Ok(path)
        }
    }

    fn url_from_name(&self, name: &str) -> Result<String> {
        let route = self.route(name).ok_or_else(|| {
            RouterError::BadParameter(format!("there is no route named '{name}'"))
        })?;
        Ok(self.join(route.prefix(), route.template()))
    }

    fn url_from_params(&self, parameters: &Params, current: Option<&Request>) -> Result<String> {
        let mut parameters = parameters.clone();
        if !parameters.contains(params::CONTROLLER) {
            match current.filter(|r| !r.controller.is_empty()) {
                Some(request) => parameters.insert(params::CONTROLLER, request.controller.as_str()),
                None => {
                    return Err(RouterError::BadParameter(
                        "a controller is needed to generate a URL".to_string(),
                    ));
                }
            }
        }

        let route = self
            .routes
            .iter()
            .find(|route| route_accepts(route, &parameters))
            .ok_or_else(|| {
                RouterError::RouteNotFound(format!(
                    "no connected route matches {:?}",
                    parameters.iter().collect::<Vec<_>>()
                ))
            })?;

        let path = route.template.fill(|placeholder| {
            parameters.get(placeholder).or_else(|| {
                route
                    .dynamic
                    .iter()
                    .find(|(_, p)| p == placeholder)
                    .and_then(|(attribute, _)| parameters.get(attribute))
            })
        })?;

        Ok(self.join(route.prefix(), &path))
    }

    /// Builds `/<prefix key>/<rest>`, skipping empty parts.
    fn join(&self, prefix: Option<&str>, rest: &str) -> String {
        let key = prefix
            .and_then(|p| self.prefixes.get(p))
            .map_or("", String::as_str);
        let parts: Vec<&str> = [key, rest].into_iter().filter(|p| !p.is_empty()).collect();
        format!("/{}", parts.join("/"))
    }

    fn generate_name(&mut self) -> String {
        loop {
            let name = format!("route_{}", self.next_id);
            self.next_id += 1;
            if !self.names.contains_key(&name) {
                return name;
            }
        }
    }
}

/// Route equality for URL generation. Keys the route reads from the URL
/// accept any value.
fn route_accepts(route: &Route, parameters: &Params) -> bool {
    if route.dynamic.is_empty() {
        return route.equals(parameters);
    }
    let mut fixed = parameters.clone();
    for (attribute, _) in &route.dynamic {
        fixed.insert(attribute.as_str(), "");
    }
    route.equals(&fixed)
}

/// Writes a value captured for dynamic data onto the request.
fn assign_attribute(request: &mut Request, attribute: &str, value: String) {
    match attribute {
        params::CONTROLLER => request.controller = value,
        params::ACTION => request.action = value,
        params::PLUGIN => request.plugin = Some(value),
        params::PREFIX => request.prefix = Some(value),
        _ => request.params.insert(attribute, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Method;

    fn blog_router() -> Router {
        let mut router = Router::new().with_base_url("http://blog.test/");
        router.prefix("admin", "admin");
        router
            .connect("/", Params::new().controller("pages").action("home").name("home"))
            .unwrap();
        router
            .connect("posts/:id", Params::new().controller("posts").action("show"))
            .unwrap();
        router
            .connect(
                "posts",
                Params::new()
                    .controller("posts")
                    .prefix("admin")
                    .name("admin_posts"),
            )
            .unwrap();
        router
    }

    #[test]
    fn test_basic_routing() {
        let router = blog_router();

        let mut req = Request::get("/");
        router.parse(&mut req).unwrap();
        assert_eq!(req.controller, "pages");
        assert_eq!(req.action, "home");
        assert_eq!(req.path, "/");
        assert!(req.parameters.is_empty());
    }

    #[test]
    fn test_path_params() {
        let router = blog_router();

        let mut req = Request::get("/posts/42/");
        router.parse(&mut req).unwrap();
        assert_eq!(req.controller, "posts");
        assert_eq!(req.action, "show");
        assert_eq!(req.params.get("id"), Some("42"));
        assert_eq!(req.parameters, vec!["42"]);
        assert_eq!(req.path, "/posts/42");
    }

    #[test]
    fn test_prefixed_route() {
        let router = blog_router();

        let mut req = Request::get("/admin/posts");
        router.parse(&mut req).unwrap();
        assert_eq!(req.prefix.as_deref(), Some("admin"));
        assert_eq!(req.controller, "posts");
        assert_eq!(req.effective_action(), "admin_index");
    }

    #[test]
    fn test_unknown_prefix_is_rejected() {
        let mut router = Router::new();
        let err = router
            .connect("posts", Params::new().controller("posts").prefix("api"))
            .unwrap_err();
        assert!(matches!(err, RouterError::BadRouteDefinition(_)));
    }

    #[test]
    fn test_missing_controller_is_rejected() {
        let mut router = Router::new();
        let err = router
            .connect("posts", Params::new().action("index"))
            .unwrap_err();
        assert!(matches!(err, RouterError::BadRouteDefinition(_)));
    }

    #[test]
    fn test_bad_method_is_rejected() {
        let mut router = Router::new();
        let err = router
            .connect("posts", Params::new().controller("posts").method("FETCH"))
            .unwrap_err();
        assert!(matches!(err, RouterError::BadRouteDefinition(_)));
    }

    #[test]
    fn test_method_filter() {
        let mut router = Router::new();
        router
            .post("posts", Params::new().controller("posts").action("create"))
            .unwrap();

        let mut req = Request::post("/posts");
        router.parse(&mut req).unwrap();
        assert_eq!(req.action, "create");

        // GET falls through to convention
        let mut req = Request::get("/posts");
        router.parse(&mut req).unwrap();
        assert_eq!(req.action, "index");
        assert_eq!(req.method, Method::Get);
    }

    #[test]
    fn test_generated_names() {
        let mut router = Router::new();
        let first = router
            .connect("a", Params::new().controller("a"))
            .unwrap()
            .name()
            .to_string();
        let second = router
            .connect("b", Params::new().controller("b"))
            .unwrap()
            .name()
            .to_string();
        assert_eq!(first, "route_0");
        assert_eq!(second, "route_1");
    }

    #[test]
    fn test_generated_name_skips_taken() {
        let mut router = Router::new();
        router
            .connect("a", Params::new().controller("a").name("route_0"))
            .unwrap();
        let route = router.connect("b", Params::new().controller("b")).unwrap();
        assert_eq!(route.name(), "route_1");
    }

    #[test]
    fn test_named_route() {
        let router = blog_router();
        assert_eq!(router.url("admin_posts", false).unwrap(), "/admin/posts");
        assert_eq!(router.url("home", false).unwrap(), "/");
        assert_eq!(router.url("home", true).unwrap(), "http://blog.test/");
    }

    #[test]
    fn test_named_route_missing() {
        let router = blog_router();
        let err = router.url("nope", false).unwrap_err();
        assert!(matches!(err, RouterError::BadParameter(_)));
    }

    #[test]
    fn test_url_with_prefix() {
        let router = blog_router();
        let params = Params::new().controller("posts").prefix("admin");
        assert_eq!(router.url(&params, false).unwrap(), "/admin/posts");
    }

    #[test]
    fn test_url_fallback_controller() {
        let router = blog_router();
        let mut current = Request::get("/posts/1");
        router.parse(&mut current).unwrap();

        let params = Params::new().action("show").set("id", "9");
        assert_eq!(
            router.url_with_fallback(&params, false, &current).unwrap(),
            "/posts/9"
        );
        assert!(matches!(
            router.url(&params, false),
            Err(RouterError::BadParameter(_))
        ));
    }
}
