//! View tools.
//!
//! A view tool is a link rendered next to an admin page, optionally gated by
//! a permission. Route-name targets are resolved lazily through the
//! [`RouteTable`] only when the tool is rendered, so tools can be declared
//! before the routes they point at exist.

use std::collections::HashMap;

use backoffice_core::error::BackofficeResult;
use backoffice_core::principal::Principal;
use backoffice_core::routes::RouteTable;
use backoffice_core::text::DisplayName;

/// The destination of a view tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// A literal URL, used as-is.
    Url(String),
    /// A route name resolved through the route table at render time.
    RouteName(String),
}

/// A link shown alongside an admin view, optionally permission-gated.
#[derive(Debug, Clone)]
pub struct ViewTool {
    label: DisplayName,
    target: LinkTarget,
    required_permission: Option<String>,
}

impl ViewTool {
    /// Creates a tool pointing at a literal URL.
    pub fn url(label: impl Into<DisplayName>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: LinkTarget::Url(url.into()),
            required_permission: None,
        }
    }

    /// Creates a tool pointing at a named route, resolved at render time.
    pub fn route(label: impl Into<DisplayName>, route_name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: LinkTarget::RouteName(route_name.into()),
            required_permission: None,
        }
    }

    /// Gates the tool behind a permission.
    #[must_use]
    pub fn required_permission(mut self, permission: impl Into<String>) -> Self {
        self.required_permission = Some(permission.into());
        self
    }

    /// Returns the tool label.
    pub const fn label(&self) -> &DisplayName {
        &self.label
    }

    /// Returns the link target.
    pub const fn target(&self) -> &LinkTarget {
        &self.target
    }

    /// Returns the gating permission, if any.
    pub fn permission(&self) -> Option<&str> {
        self.required_permission.as_deref()
    }

    /// Resolves the tool's link.
    ///
    /// Literal URLs resolve to themselves; route names go through the route
    /// table.
    ///
    /// # Errors
    ///
    /// Returns [`NoReverseMatch`](backoffice_core::error::BackofficeError::NoReverseMatch)
    /// if a route-name target cannot be reversed.
    pub fn resolve(&self, routes: &RouteTable) -> BackofficeResult<String> {
        match &self.target {
            LinkTarget::Url(url) => Ok(url.clone()),
            LinkTarget::RouteName(name) => routes.reverse(name, &HashMap::new()),
        }
    }
}

/// Filters `tools` down to those the principal may see, preserving
/// declaration order. Tools without a permission are always included.
pub fn view_tools_for<'a>(tools: &'a [ViewTool], principal: &Principal) -> Vec<&'a ViewTool> {
    tools
        .iter()
        .filter(|tool| {
            tool.required_permission
                .as_deref()
                .map_or(true, |perm| principal.has_perm(perm))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff_with(perm: &str) -> Principal {
        Principal::new("staff", "staff@example.com").staff().with_perm(perm)
    }

    #[test]
    fn test_url_tool_resolves_to_itself() {
        let routes = RouteTable::new();
        let tool = ViewTool::url("Docs", "https://example.com/docs");
        assert_eq!(tool.resolve(&routes).unwrap(), "https://example.com/docs");
    }

    #[test]
    fn test_route_tool_resolves_lazily() {
        let mut routes = RouteTable::new();
        let tool = ViewTool::route("Report", "sales_report");

        // Declared before the route exists; resolution fails until then.
        assert!(tool.resolve(&routes).is_err());

        routes.register(None, "sales_report", "/admin/sales/report/").unwrap();
        assert_eq!(tool.resolve(&routes).unwrap(), "/admin/sales/report/");
    }

    #[test]
    fn test_view_tools_for_filters_by_permission() {
        let tools = vec![
            ViewTool::url("Open", "/open/"),
            ViewTool::url("Gated", "/gated/").required_permission("sales.can_view_gated"),
        ];

        let allowed = staff_with("sales.can_view_gated");
        let denied = staff_with("sales.other");

        assert_eq!(view_tools_for(&tools, &allowed).len(), 2);

        let visible = view_tools_for(&tools, &denied);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].label().raw(), "Open");
    }

    #[test]
    fn test_view_tools_for_preserves_order() {
        let tools = vec![
            ViewTool::url("First", "/1/"),
            ViewTool::url("Second", "/2/"),
            ViewTool::url("Third", "/3/"),
        ];
        let principal = staff_with("any.perm");
        let labels: Vec<String> = view_tools_for(&tools, &principal)
            .iter()
            .map(|t| t.label().raw().to_string())
            .collect();
        assert_eq!(labels, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_superuser_sees_gated_tools() {
        let tools =
            vec![ViewTool::url("Gated", "/gated/").required_permission("sales.can_view_gated")];
        let root = Principal::new("root", "root@example.com").staff().superuser();
        assert_eq!(view_tools_for(&tools, &root).len(), 1);
    }
}
