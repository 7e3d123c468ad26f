//! Application-label derivation from module paths.
//!
//! Registered views and endpoints are owned by an application, identified by
//! a label derived from the declaring module path (the value of
//! `module_path!()` at the declaration site). A path the label cannot be
//! derived from is a configuration error raised at registration time.

use crate::error::{BackofficeError, BackofficeResult};

/// Derives the owning application label from a module path: the first
/// `::`-segment, lowercased.
///
/// # Errors
///
/// Returns [`BackofficeError::ImproperlyConfigured`] if the path is empty.
///
/// # Examples
///
/// ```
/// use backoffice_core::apps::app_label_from_module;
///
/// assert_eq!(app_label_from_module("fruit::api").unwrap(), "fruit");
/// assert_eq!(app_label_from_module("shop").unwrap(), "shop");
/// ```
pub fn app_label_from_module(module_path: &str) -> BackofficeResult<String> {
    let first = module_path.split("::").next().unwrap_or("").trim();
    if first.is_empty() {
        return Err(BackofficeError::ImproperlyConfigured(format!(
            "Cannot derive app label from module path '{module_path}'"
        )));
    }
    Ok(first.to_lowercase())
}

/// Derives the owning application label for an admin view: the segment
/// immediately preceding a trailing `admin` segment in the module path.
///
/// Admin views are declared in an application's `admin` module
/// (`myapp::admin`), which marks `myapp` as the owner.
///
/// # Errors
///
/// Returns [`BackofficeError::ImproperlyConfigured`] if the path does not
/// contain an `admin` segment preceded by an owner segment. This is fatal:
/// a misplaced admin view must fail at registration, not at request time.
pub fn admin_app_label(module_path: &str) -> BackofficeResult<String> {
    let segments: Vec<&str> = module_path.split("::").collect();
    segments
        .windows(2)
        .rev()
        .find(|pair| pair[1] == "admin" && !pair[0].is_empty())
        .map(|pair| pair[0].to_lowercase())
        .ok_or_else(|| {
            BackofficeError::ImproperlyConfigured(format!(
                "Admin views must live in an application's 'admin' module; \
                 cannot derive app label from '{module_path}'"
            ))
        })
}
