//! Route template compilation and matching.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, RouterError};

/// A placeholder token: a colon followed by one or more alphanumerics.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([a-zA-Z0-9]+)").expect("Invalid placeholder regex"));

/// Returns the placeholder name if `value` is a whole placeholder
/// reference such as `:controller`.
///
/// ```
/// use oxide_routing::path::placeholder_reference;
///
/// assert_eq!(placeholder_reference(":controller"), Some("controller"));
/// assert_eq!(placeholder_reference("posts"), None);
/// assert_eq!(placeholder_reference("app::Posts"), None);
/// ```
pub fn placeholder_reference(value: &str) -> Option<&str> {
    let name = value.strip_prefix(':')?;
    (!name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric())).then_some(name)
}

/// Trims the separators surrounding a template or path.
pub fn trim_slashes(path: &str) -> &str {
    path.trim_matches('/')
}

/// A compiled route template.
///
/// Template syntax:
/// - `posts` - Literal path
/// - `posts/:id` - Path with a placeholder
/// - `:controller/:action` - Placeholders only
///
/// Each placeholder matches one run of non-separator characters and is
/// captured positionally, in declaration order.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    /// The template with surrounding slashes removed.
    template: String,
    /// Compiled regex for matching.
    regex: Regex,
    /// Placeholder names in declaration order.
    placeholders: Vec<String>,
}

impl RoutePattern {
    /// Compiles a template.
    ///
    /// # Example
    ///
    /// ```
    /// use oxide_routing::RoutePattern;
    ///
    /// let pattern = RoutePattern::new("/posts/:id/comments/:comment").unwrap();
    /// let captures = pattern.captures("posts/12/comments/7").unwrap();
    /// assert_eq!(captures, vec!["12", "7"]);
    /// assert_eq!(pattern.placeholders(), ["id", "comment"]);
    /// ```
    pub fn new(template: &str) -> Result<Self> {
        let template = trim_slashes(template);
        let mut regex_str = String::from("^");
        let mut placeholders = Vec::new();
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(template) {
            let (Some(token), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            regex_str.push_str(&regex::escape(&template[last..token.start()]));
            regex_str.push_str("([^/]+)");
            placeholders.push(name.as_str().to_string());
            last = token.end();
        }
        regex_str.push_str(&regex::escape(&template[last..]));
        regex_str.push('$');

        let regex = Regex::new(&regex_str)
            .map_err(|e| RouterError::InvalidPattern(format!("{template}: {e}")))?;

        Ok(Self {
            template: template.to_string(),
            regex,
            placeholders,
        })
    }

    /// Attempts to match a normalized path (no surrounding slashes).
    ///
    /// Returns the captured values in placeholder order.
    pub fn captures(&self, path: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(path)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect(),
        )
    }

    /// Returns true if the full path matches.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Returns the template without surrounding slashes.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the placeholder names in declaration order.
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Position of a placeholder among the captures. A name used twice
    /// refers to its last occurrence.
    pub fn index_of(&self, placeholder: &str) -> Option<usize> {
        self.placeholders.iter().rposition(|p| p == placeholder)
    }

    /// Substitutes every placeholder with the value `lookup` returns for it.
    ///
    /// # Example
    ///
    /// ```
    /// use oxide_routing::RoutePattern;
    ///
    /// let pattern = RoutePattern::new("posts/:id").unwrap();
    /// let path = pattern.fill(|name| (name == "id").then_some("42")).unwrap();
    /// assert_eq!(path, "posts/42");
    /// ```
    pub fn fill<'a, F>(&self, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let mut path = String::with_capacity(self.template.len());
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(&self.template) {
            let (Some(token), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = lookup(name.as_str())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    RouterError::BadParameter(format!(
                        "the parameter '{}' is missing to build '{}'",
                        name.as_str(),
                        self.template
                    ))
                })?;
            path.push_str(&self.template[last..token.start()]);
            path.push_str(value);
            last = token.end();
        }
        path.push_str(&self.template[last..]);

        Ok(path)
    }
}
