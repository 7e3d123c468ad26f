//! Named-route registry and reverse URL resolution.
//!
//! [`RouteTable`] is the reverse-routing primitive the toolkit consumes:
//! routes are registered by name (optionally under a namespace) together with
//! a pattern template, and [`RouteTable::reverse`] substitutes arguments back
//! into the template. Namespaced lookups use colon-separated names
//! (e.g. `"admin:v1.0:fruit.apple-list"`).

use std::collections::HashMap;

use crate::error::{BackofficeError, BackofficeResult};

/// A registry of named URL patterns supporting reverse resolution.
///
/// The table is populated at startup, before any request is served, and is
/// read-only afterwards. Registering two routes under the same qualified
/// name is a configuration error surfaced immediately.
///
/// # Examples
///
/// ```
/// use backoffice_core::routes::RouteTable;
/// use std::collections::HashMap;
///
/// let mut table = RouteTable::new();
/// table
///     .register(Some("v1.0"), "fruit.apple-detail", "/v1.0/fruit/apple/<pk>/")
///     .unwrap();
///
/// let mut kwargs = HashMap::new();
/// kwargs.insert("pk", "7");
/// let url = table.reverse("v1.0:fruit.apple-detail", &kwargs).unwrap();
/// assert_eq!(url, "/v1.0/fruit/apple/7/");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    /// Qualified route name -> pattern template.
    routes: HashMap<String, String>,
}

impl RouteTable {
    /// Creates an empty route table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a named route pattern, optionally under a namespace.
    ///
    /// The pattern may contain `<name>` or `<type:name>` placeholders which
    /// [`reverse`](Self::reverse) substitutes from its kwargs.
    ///
    /// # Errors
    ///
    /// Returns [`BackofficeError::ImproperlyConfigured`] if the qualified
    /// name is already registered.
    pub fn register(
        &mut self,
        namespace: Option<&str>,
        name: &str,
        pattern: &str,
    ) -> BackofficeResult<()> {
        let qualified = namespace.map_or_else(|| name.to_string(), |ns| format!("{ns}:{name}"));
        if self.routes.contains_key(&qualified) {
            return Err(BackofficeError::ImproperlyConfigured(format!(
                "Route '{qualified}' is already registered"
            )));
        }
        self.routes.insert(qualified, pattern.to_string());
        Ok(())
    }

    /// Returns `true` if a route with the given qualified name exists.
    pub fn contains(&self, qualified_name: &str) -> bool {
        self.routes.contains_key(qualified_name)
    }

    /// Returns the number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Generates a URL for a named route, substituting the given kwargs.
    ///
    /// # Errors
    ///
    /// Returns [`BackofficeError::NoReverseMatch`] if no route with the
    /// qualified name exists or a placeholder has no matching kwarg.
    pub fn reverse(
        &self,
        qualified_name: &str,
        kwargs: &HashMap<&str, &str>,
    ) -> BackofficeResult<String> {
        let pattern = self
            .routes
            .get(qualified_name)
            .ok_or_else(|| BackofficeError::NoReverseMatch(qualified_name.to_string()))?;

        let url = substitute_pattern(qualified_name, pattern, kwargs)?;
        if url.starts_with('/') {
            Ok(url)
        } else {
            Ok(format!("/{url}"))
        }
    }

    /// Clears all registered routes. Intended for test isolation.
    pub fn reset(&mut self) {
        self.routes.clear();
    }
}

/// Substitutes kwargs into a route template string.
///
/// Replaces `<name>` and `<type:name>` placeholders with values from kwargs.
fn substitute_pattern(
    qualified_name: &str,
    route: &str,
    kwargs: &HashMap<&str, &str>,
) -> BackofficeResult<String> {
    let mut result = String::new();
    let mut remaining = route;

    while !remaining.is_empty() {
        if let Some(start) = remaining.find('<') {
            result.push_str(&remaining[..start]);

            let end = remaining[start..].find('>').ok_or_else(|| {
                BackofficeError::ImproperlyConfigured(format!(
                    "Unclosed angle bracket in route template: {route}"
                ))
            })? + start;

            let inner = &remaining[start + 1..end];
            // Parse "type:name" or just "name"
            let param_name = inner.find(':').map_or(inner, |pos| &inner[pos + 1..]);

            if let Some(value) = kwargs.get(param_name) {
                result.push_str(value);
            } else {
                return Err(BackofficeError::NoReverseMatch(format!(
                    "{qualified_name} (no value for parameter '{param_name}')"
                )));
            }

            remaining = &remaining[end + 1..];
        } else {
            result.push_str(remaining);
            break;
        }
    }

    Ok(result)
}
