//! View registration.
//!
//! Two explicit entry points: [`register`] with defaults and
//! [`register_with`] for callers that need overrides. Registration derives
//! the entity name from the view's type name, fabricates the
//! [`SyntheticEntity`] with its access permission, wraps the spec in a
//! [`ModelAdminView`] and inserts it into the site registry. Configuration
//! mistakes (malformed module path, duplicate label) fail immediately.

use backoffice_core::apps::admin_app_label;
use backoffice_core::error::{BackofficeError, BackofficeResult};
use backoffice_core::text::{camelcase_to_spaces, DisplayName};

use crate::entity::SyntheticEntity;
use crate::model_admin::ModelAdminView;
use crate::site::AdminSite;
use crate::view::AdminViewSpec;

/// Overrides applied during registration.
#[derive(Debug, Clone, Default)]
pub struct RegisterOptions {
    verbose_name: Option<DisplayName>,
    extra_permissions: Vec<(String, String)>,
}

impl RegisterOptions {
    /// Creates empty options; everything falls back to derivation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the entity's verbose name.
    #[must_use]
    pub fn verbose_name(mut self, name: impl Into<DisplayName>) -> Self {
        self.verbose_name = Some(name.into());
        self
    }

    /// Appends an extra permission after those the view declares.
    #[must_use]
    pub fn permission(
        mut self,
        codename: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.extra_permissions
            .push((codename.into(), description.into()));
        self
    }
}

/// Registers a view on the site with default options.
///
/// # Errors
///
/// Returns [`BackofficeError::ImproperlyConfigured`] if the view's module
/// path has no `admin` segment or if the label is already registered.
pub fn register(site: &mut AdminSite, spec: AdminViewSpec) -> BackofficeResult<()> {
    register_with(site, spec, RegisterOptions::new())
}

/// Registers a view on the site, applying the given overrides.
///
/// # Errors
///
/// Returns [`BackofficeError::ImproperlyConfigured`] if the view's module
/// path has no `admin` segment or if the label is already registered.
pub fn register_with(
    site: &mut AdminSite,
    spec: AdminViewSpec,
    options: RegisterOptions,
) -> BackofficeResult<()> {
    let app_label = admin_app_label(spec.module_path())?;
    let entity_name = entity_name_from_type(spec.type_name());

    let label = spec
        .label_override()
        .map_or_else(|| entity_name.to_lowercase(), ToString::to_string);

    if site.is_registered(&label) {
        return Err(BackofficeError::ImproperlyConfigured(format!(
            "Admin view '{label}' is already registered"
        )));
    }

    let verbose_name = options
        .verbose_name
        .or_else(|| spec.verbose_name_override().cloned())
        .unwrap_or_else(|| DisplayName::literal(camelcase_to_spaces(&entity_name)));

    let mut permissions = spec.permissions().to_vec();
    permissions.extend(options.extra_permissions);

    let entity = SyntheticEntity::new(&entity_name, &app_label, verbose_name, permissions);

    tracing::debug!(
        label = %label,
        app = %app_label,
        permission = %entity.access_permission(),
        "registering admin view"
    );

    site.insert(ModelAdminView::new(label, entity, spec))
}

/// Derives the entity name from a view type name: trailing `"Admin"` and
/// `"View"` suffixes are stripped repeatedly, then the remainder is
/// capitalized. A name reduced to nothing is kept whole.
fn entity_name_from_type(type_name: &str) -> String {
    let mut name = type_name;
    loop {
        let stripped = name
            .strip_suffix("View")
            .or_else(|| name.strip_suffix("Admin"));
        match stripped {
            Some(rest) if !rest.is_empty() => name = rest,
            _ => break,
        }
    }
    let mut chars = name.chars();
    chars.next().map_or_else(
        || type_name.to_string(),
        |first| first.to_uppercase().collect::<String>() + chars.as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(type_name: &'static str) -> AdminViewSpec {
        AdminViewSpec::new("finance::admin", type_name)
    }

    #[test]
    fn test_entity_name_strips_admin_and_view() {
        assert_eq!(entity_name_from_type("BudgetAdminView"), "Budget");
        assert_eq!(entity_name_from_type("BudgetView"), "Budget");
        assert_eq!(entity_name_from_type("BudgetAdmin"), "Budget");
        assert_eq!(entity_name_from_type("Budget"), "Budget");
    }

    #[test]
    fn test_entity_name_capitalizes_first_letter() {
        assert_eq!(entity_name_from_type("budgetView"), "Budget");
    }

    #[test]
    fn test_entity_name_bare_suffix_kept() {
        assert_eq!(entity_name_from_type("View"), "View");
        assert_eq!(entity_name_from_type("Admin"), "Admin");
    }

    #[test]
    fn test_register_defaults() {
        let mut site = AdminSite::default();
        register(&mut site, spec("BudgetAdminView")).unwrap();

        let view = site.get("budget").unwrap();
        assert_eq!(view.entity().entity_name(), "Budget");
        assert_eq!(view.entity().app_label(), "finance");
        assert_eq!(view.access_permission(), "finance.can_access_budget");
        assert_eq!(view.entity().verbose_name().raw(), "Budget");
    }

    #[test]
    fn test_register_multiword_verbose_name() {
        let mut site = AdminSite::default();
        register(&mut site, spec("MonthlyReportAdminView")).unwrap();
        let view = site.get("monthlyreport").unwrap();
        assert_eq!(view.entity().verbose_name().raw(), "Monthly Report");
    }

    #[test]
    fn test_register_with_overrides() {
        let mut site = AdminSite::default();
        register_with(
            &mut site,
            spec("BudgetAdminView"),
            RegisterOptions::new()
                .verbose_name("Budget overview")
                .permission("can_export", "Can export budgets"),
        )
        .unwrap();

        let view = site.get("budget").unwrap();
        assert_eq!(view.entity().verbose_name().raw(), "Budget overview");
        let codenames: Vec<&str> = view
            .entity()
            .permissions()
            .iter()
            .map(|(c, _)| c.as_str())
            .collect();
        assert_eq!(codenames, vec!["can_access_budget", "can_export"]);
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let mut site = AdminSite::default();
        register(&mut site, spec("BudgetAdminView")).unwrap();
        let err = register(&mut site, spec("BudgetAdminView")).unwrap_err();
        assert!(matches!(err, BackofficeError::ImproperlyConfigured(_)));
    }

    #[test]
    fn test_malformed_module_path_rejected() {
        let mut site = AdminSite::default();
        let bad = AdminViewSpec::new("finance::views", "BudgetAdminView");
        let err = register(&mut site, bad).unwrap_err();
        assert!(matches!(err, BackofficeError::ImproperlyConfigured(_)));
    }

    #[test]
    fn test_label_override() {
        let mut site = AdminSite::default();
        register(&mut site, spec("BudgetAdminView").label("money")).unwrap();
        assert!(site.get("money").is_some());
        assert!(site.get("budget").is_none());
    }
}
