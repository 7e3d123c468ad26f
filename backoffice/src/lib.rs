//! # backoffice
//!
//! An admin-site extension and admin REST API toolkit.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient
//! access. Depend on `backoffice` for the whole toolkit, or on the
//! individual crates for finer-grained control.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use backoffice::api::auth::ApiContext;
//! use backoffice::api::router::ApiRouter;
//! use backoffice::api::views::register_builtins;
//!
//! # fn main() -> backoffice::core::error::BackofficeResult<()> {
//! let settings = backoffice::core::settings::SiteSettings::from_env();
//! backoffice::core::logging::setup_logging(&settings);
//!
//! let mut router = ApiRouter::new("admin", "v1.0", Arc::new(ApiContext::in_memory()));
//! register_builtins(&mut router)?;
//! let app = router.into_axum_router();
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

/// Core types: errors, settings, principals, routes, text, i18n, logging.
pub use backoffice_core as core;

/// The admin site: synthetic entities, registration, guarded dispatch.
#[cfg(feature = "admin")]
pub use backoffice_admin as admin;

/// The admin REST API: endpoints, router, schema, navigation, sessions.
#[cfg(feature = "api")]
pub use backoffice_api as api;
