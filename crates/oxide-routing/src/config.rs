//! Routing configuration loaded from JSON.
//!
//! ```json
//! {
//!   "app": { "base_url": "https://example.com" },
//!   "prefixes": [{ "url_key": "admin", "prefix": "admin" }],
//!   "routes": [
//!     { "template": "/", "controller": "pages", "action": "home", "name": "home" },
//!     { "template": "posts/:id", "controller": "posts", "action": "show", "method": "GET" },
//!     { "template": "posts", "controller": "posts", "prefix": "admin" }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, RouterError};
use crate::params::Params;
use crate::router::Router;

/// Application-wide settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Scheme and host prepended to full URLs.
    #[serde(alias = "baseUrl")]
    pub base_url: String,
}

/// A prefix declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct PrefixConfig {
    /// Path segment(s) that activate the prefix.
    pub url_key: String,
    /// Prefix identifier, also the action qualifier.
    pub prefix: String,
}

/// A route declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteConfig {
    /// Route template, such as `posts/:id`.
    pub template: String,
    /// Controller, short or fully qualified.
    pub controller: String,
    /// Action, `index` when absent.
    #[serde(default)]
    pub action: Option<String>,
    /// HTTP method, any when absent.
    #[serde(default)]
    pub method: Option<String>,
    /// Declared prefix.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Plugin tag.
    #[serde(default)]
    pub plugin: Option<String>,
    /// Route name.
    #[serde(default)]
    pub name: Option<String>,
    /// Any other parameters, such as dynamic data.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl RouteConfig {
    /// The registration parameters for this route.
    pub fn params(&self) -> Params {
        let mut params = Params::new().controller(self.controller.as_str());
        let optional = [
            (crate::params::ACTION, &self.action),
            (crate::params::METHOD, &self.method),
            (crate::params::PREFIX, &self.prefix),
            (crate::params::PLUGIN, &self.plugin),
            (crate::params::NAME, &self.name),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                params.insert(key, value.as_str());
            }
        }
        for (key, value) in &self.extra {
            params.insert(key.as_str(), value.as_str());
        }
        params
    }
}

/// The full routing configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application settings.
    pub app: AppConfig,
    /// Prefixes, declared before any route.
    pub prefixes: Vec<PrefixConfig>,
    /// Routes in match order.
    pub routes: Vec<RouteConfig>,
}

impl Config {
    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RouterError::Config(e.to_string()))
    }

    /// Reads and parses a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| RouterError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&json)
            .map_err(|e| RouterError::Config(format!("{}: {e}", path.display())))
    }

    /// Builds a router: prefixes first, then routes in file order.
    pub fn build_router(&self) -> Result<Router> {
        let mut router = Router::new().with_base_url(self.app.base_url.as_str());
        for prefix in &self.prefixes {
            router.prefix(&prefix.url_key, &prefix.prefix);
        }
        for route in &self.routes {
            router.connect(&route.template, route.params())?;
        }
        Ok(router)
    }
}
