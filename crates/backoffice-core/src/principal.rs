//! The principal: the authenticated (or anonymous) actor making a request.
//!
//! A [`Principal`] carries identity, the staff/superuser flags the admin
//! guard checks, and the flat permission set consulted by
//! [`has_perm`](Principal::has_perm). Permission strings use the
//! `"app_label.codename"` format.

use serde::{Deserialize, Serialize};

/// The actor behind a request.
///
/// Anonymous principals have no identity and no permissions. Inactive
/// principals never pass a permission check; superusers always do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// The unique username. Empty for anonymous principals.
    pub username: String,
    /// The principal's email address.
    pub email: String,
    /// The principal's first name.
    pub first_name: String,
    /// The principal's last name.
    pub last_name: String,
    /// Whether this account is active. Inactive accounts have no permissions.
    pub is_active: bool,
    /// Whether this principal may access the admin site.
    pub is_staff: bool,
    /// Whether this principal has all permissions unconditionally.
    pub is_superuser: bool,
    /// Whether this principal is authenticated at all.
    pub is_authenticated: bool,
    /// Permission codenames in `"app_label.codename"` format.
    pub permissions: Vec<String>,
}

impl Principal {
    /// Creates an authenticated, active, non-staff principal.
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
            is_active: true,
            is_staff: false,
            is_superuser: false,
            is_authenticated: true,
            permissions: Vec::new(),
        }
    }

    /// Creates the anonymous principal.
    pub fn anonymous() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            is_active: false,
            is_staff: false,
            is_superuser: false,
            is_authenticated: false,
            permissions: Vec::new(),
        }
    }

    /// Marks this principal as staff.
    #[must_use]
    pub fn staff(mut self) -> Self {
        self.is_staff = true;
        self
    }

    /// Marks this principal as superuser.
    #[must_use]
    pub fn superuser(mut self) -> Self {
        self.is_superuser = true;
        self
    }

    /// Grants a permission in `"app_label.codename"` format.
    #[must_use]
    pub fn with_perm(mut self, perm: impl Into<String>) -> Self {
        self.permissions.push(perm.into());
        self
    }

    /// Returns `true` if this principal is anonymous.
    pub fn is_anonymous(&self) -> bool {
        !self.is_authenticated
    }

    /// Returns the principal's full name (first + last, trimmed).
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Checks whether this principal holds a specific permission.
    ///
    /// Inactive principals never hold permissions; superusers hold all of
    /// them.
    pub fn has_perm(&self, perm: &str) -> bool {
        if !self.is_active {
            return false;
        }
        if self.is_superuser {
            return true;
        }
        self.permissions.iter().any(|p| p == perm)
    }

    /// Checks whether this principal holds all of the given permissions.
    pub fn has_perms(&self, perms: &[&str]) -> bool {
        perms.iter().all(|p| self.has_perm(p))
    }

    /// Checks whether this principal holds any permission under the given
    /// app label.
    pub fn has_module_perms(&self, app_label: &str) -> bool {
        if !self.is_active {
            return false;
        }
        if self.is_superuser {
            return true;
        }
        let prefix = format!("{app_label}.");
        self.permissions.iter().any(|p| p.starts_with(&prefix))
    }
}
