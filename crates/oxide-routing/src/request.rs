//! HTTP request type and the routing data filled into it.

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::RouterError;

/// HTTP request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET method
    Get,
    /// POST method
    Post,
    /// PUT method
    Put,
    /// PATCH method
    Patch,
    /// DELETE method
    Delete,
    /// HEAD method
    Head,
    /// OPTIONS method
    Options,
}

impl Method {
    /// Returns the method as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl FromStr for Method {
    type Err = RouterError;

    /// Parses a method name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            _ => Err(RouterError::BadParameter(format!("unknown HTTP method '{s}'"))),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The set of methods a route accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodFilter {
    /// Any method.
    #[default]
    Any,
    /// Exactly one method.
    Only(Method),
}

impl MethodFilter {
    /// Returns true if a request with `method` passes the filter.
    pub fn accepts(&self, method: Method) -> bool {
        match self {
            Self::Any => true,
            Self::Only(m) => *m == method,
        }
    }
}

impl FromStr for MethodFilter {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "*" | "any" | "all" => Ok(Self::Any),
            other => other.parse().map(Self::Only),
        }
    }
}

impl std::fmt::Display for MethodFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => f.write_str("ANY"),
            Self::Only(m) => write!(f, "{m}"),
        }
    }
}

/// Named values captured from the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    params: HashMap<String, String>,
}

impl PathParams {
    /// Creates new empty path params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Gets a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Parses a parameter as a specific type.
    pub fn parse<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    /// Returns the number of captured values.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns true when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns an iterator over the parameters.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn clear(&mut self) {
        self.params.clear();
    }
}

/// An HTTP request, filled in by [`Router::parse`](crate::Router::parse).
///
/// Before parsing only `method`, `path`, `headers` and `body` are meaningful.
/// After a successful parse `controller` and `action` are always non-empty.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Request path. Normalized to a single leading slash by parsing.
    pub path: String,
    /// Short name of the resolved controller.
    pub controller: String,
    /// Resolved action name, without any prefix qualifier.
    pub action: String,
    /// Resolved prefix identifier, if the route lives under one.
    pub prefix: Option<String>,
    /// Resolved plugin tag.
    pub plugin: Option<String>,
    /// Positional parameters handed to the action, in URL order.
    pub parameters: Vec<String>,
    /// Named values captured from the URL.
    pub params: PathParams,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Vec<u8>,
}

impl Request {
    /// Creates a new request.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            controller: String::new(),
            action: String::new(),
            prefix: None,
            plugin: None,
            parameters: Vec::new(),
            params: PathParams::new(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Creates a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Creates a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Gets a header value.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        // Case-insensitive header lookup
        let key_lower = key.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == key_lower)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the body as a string.
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }

    /// Name of the controller method that serves this request.
    ///
    /// Prefixed requests call `<prefix>_<action>`, so `/admin/posts` under
    /// the `admin` prefix runs `admin_index`.
    pub fn effective_action(&self) -> String {
        match self.prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}_{}", self.action),
            _ => self.action.clone(),
        }
    }

    /// Drops anything a previous parse left behind.
    pub(crate) fn reset_routing(&mut self) {
        self.controller.clear();
        self.action.clear();
        self.prefix = None;
        self.plugin = None;
        self.parameters.clear();
        self.params.clear();
    }
}
