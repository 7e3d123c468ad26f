//! Permission-gated dispatch for admin views.
//!
//! Every admin page sits behind two checks: the principal must be an active
//! staff member, and must hold the view's access permission. Both failures
//! produce the same redirect to the login page, so a probing client cannot
//! distinguish "not logged in as staff" from "missing this permission".

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use backoffice_core::principal::Principal;

/// The outcome of the access check. The guard holds no per-principal state;
/// every request is checked from scratch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The principal may proceed.
    Allowed,
    /// Redirect to the login page, with the requested path carried in the
    /// `next` query parameter.
    RedirectToLogin(String),
}

impl GuardOutcome {
    /// Returns `true` if access was granted.
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Checks whether `principal` may access an admin view gated by
/// `permission`.
///
/// The staff check runs first (active and staff), then the permission
/// check. Either failure yields the identical login redirect.
pub fn check_access(
    principal: &Principal,
    permission: &str,
    login_url: &str,
    requested_path: &str,
) -> GuardOutcome {
    let is_staff = principal.is_authenticated && principal.is_active && principal.is_staff;
    if is_staff && principal.has_perm(permission) {
        GuardOutcome::Allowed
    } else {
        GuardOutcome::RedirectToLogin(login_redirect(login_url, requested_path))
    }
}

/// Builds the login redirect URL with a percent-encoded `next` parameter.
fn login_redirect(login_url: &str, requested_path: &str) -> String {
    let next = utf8_percent_encode(requested_path, NON_ALPHANUMERIC);
    format!("{login_url}?next={next}")
}
