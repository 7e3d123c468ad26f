//! The admin-page wrapper around a registered view.
//!
//! [`ModelAdminView`] pairs a view spec with its fabricated
//! [`SyntheticEntity`] and exposes the permission surface the site needs:
//! the cached access permission, permission qualification, and the
//! add/change/delete/view matrix. Registered views are page-shaped, so add
//! and delete are always denied and change collapses to view access.

use backoffice_core::principal::Principal;

use crate::entity::SyntheticEntity;
use crate::view::AdminViewSpec;

/// A registered admin view with its synthetic entity.
#[derive(Debug, Clone)]
pub struct ModelAdminView {
    label: String,
    entity: SyntheticEntity,
    spec: AdminViewSpec,
    access_permission: String,
}

impl ModelAdminView {
    /// Wraps a view spec and its entity. The access permission is computed
    /// once and cached.
    pub fn new(label: impl Into<String>, entity: SyntheticEntity, spec: AdminViewSpec) -> Self {
        let access_permission = entity.access_permission();
        Self {
            label: label.into(),
            entity,
            spec,
            access_permission,
        }
    }

    /// Returns the registry label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the synthetic entity.
    pub const fn entity(&self) -> &SyntheticEntity {
        &self.entity
    }

    /// Returns the view spec.
    pub const fn spec(&self) -> &AdminViewSpec {
        &self.spec
    }

    /// Returns the cached, fully-qualified access permission.
    pub fn access_permission(&self) -> &str {
        &self.access_permission
    }

    /// Qualifies a permission codename with the entity's app label unless it
    /// is already qualified.
    pub fn qualify_permission(&self, codename: &str) -> String {
        if codename.contains('.') {
            codename.to_string()
        } else {
            format!("{}.{codename}", self.entity.app_label())
        }
    }

    /// Returns whether the principal may see the owning application at all.
    pub fn has_module_permission(&self, principal: &Principal) -> bool {
        principal.has_module_perms(self.entity.app_label())
    }

    /// Returns whether the principal may view this page.
    pub fn has_view_permission(&self, principal: &Principal) -> bool {
        principal.has_perm(&self.access_permission)
    }

    /// Change access collapses to view access; the page has no edit form.
    pub fn has_change_permission(&self, principal: &Principal) -> bool {
        self.has_view_permission(principal)
    }

    /// Add is never available on a page-shaped view.
    pub const fn has_add_permission(&self, _principal: &Principal) -> bool {
        false
    }

    /// Delete is never available on a page-shaped view.
    pub const fn has_delete_permission(&self, _principal: &Principal) -> bool {
        false
    }

    /// Returns the route names this view contributes, each with its URL
    /// pattern. Both names point at the same page; the `_changelist` alias
    /// keeps index templates that link by convention working.
    pub fn route_entries(&self) -> Vec<(String, String)> {
        let app = self.entity.app_label();
        let pattern = format!("/{app}/{}/", self.label);
        vec![
            (format!("{app}_{}", self.label), pattern.clone()),
            (format!("{app}_{}_changelist", self.label), pattern),
        ]
    }
}
