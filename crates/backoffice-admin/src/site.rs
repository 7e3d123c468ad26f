//! Admin site registry and dispatch.
//!
//! The [`AdminSite`] holds every registered admin view, the site-wide
//! settings exposed to page contexts, and the route table the views'
//! tools resolve against. The registry is populated at boot and read-only
//! afterwards; [`reset`](AdminSite::reset) exists for test isolation.

use std::collections::HashMap;

use serde_json::{json, Map, Value};

use backoffice_core::error::{BackofficeError, BackofficeResult};
use backoffice_core::principal::Principal;
use backoffice_core::routes::RouteTable;
use backoffice_core::settings::SiteSettings;

use crate::guard::{check_access, GuardOutcome};
use crate::model_admin::ModelAdminView;
use crate::tools::view_tools_for;
use crate::view::{AdminRequest, AdminResponse};

/// The admin site: registry, settings, and dispatch.
///
/// # Examples
///
/// ```
/// use backoffice_admin::site::AdminSite;
/// use backoffice_admin::view::AdminViewSpec;
/// use backoffice_admin::register::register;
///
/// let mut site = AdminSite::default();
/// let spec = AdminViewSpec::new("finance::admin", "BudgetAdminView");
/// register(&mut site, spec).unwrap();
/// assert!(site.is_registered("budget"));
/// ```
#[derive(Debug)]
pub struct AdminSite {
    name: String,
    login_url: String,
    settings: SiteSettings,
    routes: RouteTable,
    registry: HashMap<String, ModelAdminView>,
}

impl Default for AdminSite {
    fn default() -> Self {
        Self::new("admin", SiteSettings::default())
    }
}

impl AdminSite {
    /// Creates a site with the given name and settings. Route names are
    /// namespaced under the site name; the login URL defaults to
    /// `/{name}/login/`.
    pub fn new(name: &str, settings: SiteSettings) -> Self {
        Self {
            name: name.to_string(),
            login_url: format!("/{name}/login/"),
            settings,
            routes: RouteTable::new(),
            registry: HashMap::new(),
        }
    }

    /// Overrides the login URL used by the access guard.
    #[must_use]
    pub fn login_url(mut self, url: &str) -> Self {
        self.login_url = url.to_string();
        self
    }

    /// Returns the site name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the site settings.
    pub const fn settings(&self) -> &SiteSettings {
        &self.settings
    }

    /// Returns the route table views and tools resolve against.
    pub const fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Returns whether a label is registered.
    pub fn is_registered(&self, label: &str) -> bool {
        self.registry.contains_key(label)
    }

    /// Returns the registered view for a label, if any.
    pub fn get(&self, label: &str) -> Option<&ModelAdminView> {
        self.registry.get(label)
    }

    /// Returns all registered labels, sorted.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.registry.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    /// Inserts a wrapped view and registers its route names. Used by
    /// [`register`](crate::register::register); not part of the public
    /// registration surface.
    ///
    /// # Errors
    ///
    /// Returns [`BackofficeError::ImproperlyConfigured`] on a duplicate
    /// label or route name.
    pub(crate) fn insert(&mut self, view: ModelAdminView) -> BackofficeResult<()> {
        for (name, pattern) in view.route_entries() {
            self.routes.register(Some(&self.name), &name, &pattern)?;
        }
        self.registry.insert(view.label().to_string(), view);
        Ok(())
    }

    /// Dispatches an action on a registered view.
    ///
    /// The access guard runs first; a failed check yields a redirect
    /// response, not an error. The handler's page context is augmented with
    /// the site context and the principal's visible tools.
    ///
    /// # Errors
    ///
    /// Returns [`BackofficeError::NotFound`] for an unknown label and
    /// [`BackofficeError::MethodNotAllowed`] for an action the view does
    /// not handle.
    pub fn dispatch(
        &self,
        label: &str,
        action: &str,
        principal: &Principal,
        path: &str,
    ) -> BackofficeResult<AdminResponse> {
        let view = self.registry.get(label).ok_or_else(|| {
            BackofficeError::NotFound(format!("No admin view registered as '{label}'"))
        })?;

        match check_access(principal, view.access_permission(), &self.login_url, path) {
            GuardOutcome::RedirectToLogin(url) => return Ok(AdminResponse::Redirect(url)),
            GuardOutcome::Allowed => {}
        }

        let handler = view.spec().handler_for(action).ok_or_else(|| {
            BackofficeError::MethodNotAllowed(format!(
                "View '{label}' does not handle '{action}'"
            ))
        })?;

        let request = AdminRequest {
            principal: principal.clone(),
            path: path.to_string(),
        };

        match handler(&request)? {
            AdminResponse::Page { title, mut context } => {
                self.extend_context(&mut context, view, principal);
                Ok(AdminResponse::Page { title, context })
            }
            other @ AdminResponse::Redirect(_) => Ok(other),
        }
    }

    /// Clears the registry and route table. Test isolation only.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.routes.reset();
    }

    /// Injects the site context and the principal's visible tools into a
    /// page context. Tools whose route cannot be reversed are skipped.
    fn extend_context(&self, context: &mut Map<String, Value>, view: &ModelAdminView, principal: &Principal) {
        context.insert("site".to_string(), self.site_context());

        let tools: Vec<Value> = view_tools_for(view.spec().tools(), principal)
            .into_iter()
            .filter_map(|tool| match tool.resolve(&self.routes) {
                Ok(url) => Some(json!({
                    "label": tool.label().render(),
                    "url": url,
                })),
                Err(err) => {
                    tracing::warn!(label = %tool.label().raw(), %err, "skipping unresolvable view tool");
                    None
                }
            })
            .collect();
        context.insert("view_tools".to_string(), Value::Array(tools));
    }

    /// The branding context exposed to every rendered page.
    fn site_context(&self) -> Value {
        json!({
            "site_title": self.settings.site_title,
            "site_header": self.settings.site_header,
            "index_title": self.settings.index_title,
            "primary_color": self.settings.primary_color,
            "secondary_color": self.settings.secondary_color,
            "logo": self.settings.logo,
            "logo_align": self.settings.logo_align,
            "logo_style": self.settings.logo_style,
            "version": self.settings.site_version,
        })
    }
}
