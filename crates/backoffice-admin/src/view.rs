//! Admin view declarations.
//!
//! An [`AdminViewSpec`] is what a class-based admin view declares about
//! itself: where it lives, what it is called, which extra permissions it
//! carries, its tools, and a handler per action. The site turns the spec
//! into a registered, permission-gated page at registration time.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use backoffice_core::error::BackofficeResult;
use backoffice_core::principal::Principal;
use backoffice_core::text::DisplayName;

use crate::tools::ViewTool;

/// The outcome of handling an admin view action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminResponse {
    /// A rendered admin page. Rendering itself is an external collaborator;
    /// the context carries everything the template needs.
    Page {
        /// The page title.
        title: String,
        /// Template context, JSON-shaped.
        context: Map<String, Value>,
    },
    /// A redirect to another URL.
    Redirect(String),
}

/// The request an admin view handler receives.
#[derive(Debug, Clone)]
pub struct AdminRequest {
    /// The acting principal.
    pub principal: Principal,
    /// The requested path, used for the login redirect's `next` parameter.
    pub path: String,
}

/// An action handler for an admin view.
pub type AdminHandler =
    Arc<dyn Fn(&AdminRequest) -> BackofficeResult<AdminResponse> + Send + Sync>;

/// Everything a class-based admin view declares.
///
/// Built with the builder pattern and handed to
/// [`register`](crate::register::register):
///
/// ```
/// use backoffice_admin::view::{AdminRequest, AdminResponse, AdminViewSpec};
///
/// let spec = AdminViewSpec::new(module_path!(), "BudgetAdminView")
///     .permission("can_export", "Can export budgets")
///     .handler("get", |_req: &AdminRequest| {
///         Ok(AdminResponse::Page {
///             title: "Budget".to_string(),
///             context: serde_json::Map::new(),
///         })
///     });
/// assert_eq!(spec.type_name(), "BudgetAdminView");
/// ```
#[derive(Clone)]
pub struct AdminViewSpec {
    module_path: &'static str,
    type_name: &'static str,
    label: Option<String>,
    verbose_name: Option<DisplayName>,
    permissions: Vec<(String, String)>,
    tools: Vec<ViewTool>,
    handlers: HashMap<String, AdminHandler>,
}

impl AdminViewSpec {
    /// Creates a new view spec. `module_path` should come from
    /// `module_path!()` at the declaration site.
    pub fn new(module_path: &'static str, type_name: &'static str) -> Self {
        Self {
            module_path,
            type_name,
            label: None,
            verbose_name: None,
            permissions: Vec::new(),
            tools: Vec::new(),
            handlers: HashMap::new(),
        }
    }

    /// Overrides the registry label (defaults to the lowercased entity
    /// name).
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the human-readable name.
    #[must_use]
    pub fn verbose_name(mut self, name: impl Into<DisplayName>) -> Self {
        self.verbose_name = Some(name.into());
        self
    }

    /// Declares an extra permission as `(codename, description)`.
    /// Declaration order is preserved.
    #[must_use]
    pub fn permission(
        mut self,
        codename: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.permissions.push((codename.into(), description.into()));
        self
    }

    /// Adds a view tool.
    #[must_use]
    pub fn tool(mut self, tool: ViewTool) -> Self {
        self.tools.push(tool);
        self
    }

    /// Registers a handler for an action name.
    #[must_use]
    pub fn handler<F>(mut self, action: impl Into<String>, f: F) -> Self
    where
        F: Fn(&AdminRequest) -> BackofficeResult<AdminResponse> + Send + Sync + 'static,
    {
        self.handlers.insert(action.into(), Arc::new(f));
        self
    }

    /// Returns the declaring module path.
    pub const fn module_path(&self) -> &'static str {
        self.module_path
    }

    /// Returns the view's type name.
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the explicit label override, if any.
    pub fn label_override(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the declared verbose name, if any.
    pub const fn verbose_name_override(&self) -> Option<&DisplayName> {
        self.verbose_name.as_ref()
    }

    /// Returns the extra permissions in declaration order.
    pub fn permissions(&self) -> &[(String, String)] {
        &self.permissions
    }

    /// Returns the declared tools.
    pub fn tools(&self) -> &[ViewTool] {
        &self.tools
    }

    /// Returns the handler for an action, if declared.
    pub fn handler_for(&self, action: &str) -> Option<&AdminHandler> {
        self.handlers.get(action)
    }

    /// Returns the declared action names, sorted.
    pub fn actions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for AdminViewSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminViewSpec")
            .field("module_path", &self.module_path)
            .field("type_name", &self.type_name)
            .field("label", &self.label)
            .field("verbose_name", &self.verbose_name)
            .field("permissions", &self.permissions)
            .field("actions", &self.actions())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let spec = AdminViewSpec::new("myapp::admin", "BudgetAdminView");
        assert_eq!(spec.module_path(), "myapp::admin");
        assert_eq!(spec.type_name(), "BudgetAdminView");
        assert!(spec.label_override().is_none());
        assert!(spec.verbose_name_override().is_none());
        assert!(spec.permissions().is_empty());
        assert!(spec.tools().is_empty());
        assert!(spec.handler_for("get").is_none());
    }

    #[test]
    fn test_handler_registration() {
        let spec = AdminViewSpec::new("myapp::admin", "BudgetAdminView").handler("get", |req| {
            Ok(AdminResponse::Page {
                title: format!("Hello {}", req.principal.username),
                context: Map::new(),
            })
        });

        let request = AdminRequest {
            principal: Principal::new("alice", "alice@example.com"),
            path: "/admin/myapp/budget/".to_string(),
        };
        let handler = spec.handler_for("get").unwrap();
        match handler(&request).unwrap() {
            AdminResponse::Page { title, .. } => assert_eq!(title, "Hello alice"),
            AdminResponse::Redirect(_) => panic!("expected a page"),
        }
    }

    #[test]
    fn test_permission_declaration_order() {
        let spec = AdminViewSpec::new("myapp::admin", "X")
            .permission("can_b", "B")
            .permission("can_a", "A");
        let codenames: Vec<&str> = spec.permissions().iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(codenames, vec!["can_b", "can_a"]);
    }

    #[test]
    fn test_actions_sorted() {
        let spec = AdminViewSpec::new("myapp::admin", "X")
            .handler("post", |_| Ok(AdminResponse::Redirect("/".to_string())))
            .handler("get", |_| Ok(AdminResponse::Redirect("/".to_string())));
        assert_eq!(spec.actions(), vec!["get", "post"]);
    }
}
