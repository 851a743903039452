//! Parameter sets for route registration and URL generation.

use std::collections::BTreeMap;

/// Key naming the controller.
pub const CONTROLLER: &str = "controller";
/// Key naming the action.
pub const ACTION: &str = "action";
/// Key naming the method filter.
pub const METHOD: &str = "method";
/// Key naming the prefix.
pub const PREFIX: &str = "prefix";
/// Key naming the plugin.
pub const PLUGIN: &str = "plugin";
/// Key naming the route.
pub const NAME: &str = "name";

/// A string-keyed parameter set.
///
/// When connecting a route the recognised keys are `controller`, `action`,
/// `method`, `prefix`, `plugin` and `name`; any value holding a placeholder
/// token (`:id`) is bound to the matching URL segment at parse time. When
/// generating a URL the same keys select the route and every other key
/// fills the placeholder of the same name.
///
/// ```
/// use oxide_routing::Params;
///
/// let params = Params::new()
///     .controller("posts")
///     .action("show")
///     .set("id", "42");
/// assert_eq!(params.get("controller"), Some("posts"));
/// assert_eq!(params.get("id"), Some("42"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<String, String>,
}

impl Params {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an arbitrary key.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets the controller (short or fully-qualified name).
    #[must_use]
    pub fn controller(self, controller: impl Into<String>) -> Self {
        self.set(CONTROLLER, controller)
    }

    /// Sets the action.
    #[must_use]
    pub fn action(self, action: impl Into<String>) -> Self {
        self.set(ACTION, action)
    }

    /// Restricts the route to one HTTP method.
    #[must_use]
    pub fn method(self, method: impl Into<String>) -> Self {
        self.set(METHOD, method)
    }

    /// Places the route under a registered prefix.
    #[must_use]
    pub fn prefix(self, prefix: impl Into<String>) -> Self {
        self.set(PREFIX, prefix)
    }

    /// Tags the route with a plugin.
    #[must_use]
    pub fn plugin(self, plugin: impl Into<String>) -> Self {
        self.set(PLUGIN, plugin)
    }

    /// Names the route.
    #[must_use]
    pub fn name(self, name: impl Into<String>) -> Self {
        self.set(NAME, name)
    }

    /// Inserts a value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Returns a value. Empty strings count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Returns true if the key holds a non-empty value.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over the non-empty entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}
