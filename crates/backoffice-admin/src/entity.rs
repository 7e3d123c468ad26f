//! Synthetic entities.
//!
//! Admin views are not backed by a persistent model, but the permission
//! system is entity-shaped. Registration fabricates a [`SyntheticEntity`]
//! that exists only to anchor permissions and display names. Entities are
//! immutable after creation.

use backoffice_core::text::DisplayName;

/// A fake, non-persisted entity fabricated for a registered admin view.
///
/// The first permission is always the access permission
/// (`can_access_<entity>`); extra permissions declared by the view follow in
/// declaration order.
#[derive(Debug, Clone)]
pub struct SyntheticEntity {
    entity_name: String,
    app_label: String,
    verbose_name: DisplayName,
    permissions: Vec<(String, String)>,
}

impl SyntheticEntity {
    /// Fabricates a new entity.
    ///
    /// The access permission codename is derived from the lowercased entity
    /// name and is always the first entry; `extra_permissions` keep their
    /// declaration order after it.
    pub fn new(
        entity_name: impl Into<String>,
        app_label: impl Into<String>,
        verbose_name: DisplayName,
        extra_permissions: Vec<(String, String)>,
    ) -> Self {
        let entity_name = entity_name.into();
        let access_codename = format!("can_access_{}", entity_name.to_lowercase());
        let access_description = format!("Can access {verbose_name}");

        let mut permissions = Vec::with_capacity(extra_permissions.len() + 1);
        permissions.push((access_codename, access_description));
        permissions.extend(extra_permissions);

        Self {
            entity_name,
            app_label: app_label.into(),
            verbose_name,
            permissions,
        }
    }

    /// Returns the entity name (e.g. `"Budget"`).
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// Returns the owning application label.
    pub fn app_label(&self) -> &str {
        &self.app_label
    }

    /// Returns the human-readable name.
    pub const fn verbose_name(&self) -> &DisplayName {
        &self.verbose_name
    }

    /// Returns all permissions as `(codename, description)` pairs. The
    /// access permission is always first.
    pub fn permissions(&self) -> &[(String, String)] {
        &self.permissions
    }

    /// Returns the fully-qualified access permission,
    /// `"{app_label}.can_access_{entity}"`.
    pub fn access_permission(&self) -> String {
        format!("{}.{}", self.app_label, self.permissions[0].0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_permission_is_first() {
        let entity = SyntheticEntity::new(
            "Budget",
            "finance",
            DisplayName::literal("Budget"),
            vec![("can_export".to_string(), "Can export".to_string())],
        );
        assert_eq!(entity.permissions()[0].0, "can_access_budget");
        assert_eq!(entity.permissions()[0].1, "Can access Budget");
        assert_eq!(entity.permissions()[1].0, "can_export");
    }

    #[test]
    fn test_access_permission_qualified() {
        let entity = SyntheticEntity::new(
            "Budget",
            "finance",
            DisplayName::literal("Budget"),
            Vec::new(),
        );
        assert_eq!(entity.access_permission(), "finance.can_access_budget");
    }

    #[test]
    fn test_extra_permissions_preserve_order() {
        let entity = SyntheticEntity::new(
            "Report",
            "sales",
            DisplayName::literal("Report"),
            vec![
                ("can_b".to_string(), "B".to_string()),
                ("can_a".to_string(), "A".to_string()),
            ],
        );
        let codenames: Vec<&str> = entity.permissions().iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(codenames, vec!["can_access_report", "can_b", "can_a"]);
    }

    #[test]
    fn test_lazy_verbose_name_description_uses_render() {
        let entity = SyntheticEntity::new(
            "Budget",
            "finance",
            DisplayName::lazy("Budget"),
            Vec::new(),
        );
        assert_eq!(entity.permissions()[0].1, "Can access Budget");
    }
}
