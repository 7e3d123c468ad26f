//! # backoffice-core
//!
//! Core types for the backoffice toolkit. This crate defines the interface
//! boundary toward the host framework (principals, permission checks, reverse
//! routing) plus the ambient concerns every other crate relies on: error
//! types, display-name handling, i18n, settings, and logging.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`principal`] - The authenticated (or anonymous) actor
//! - [`routes`] - Named-route registry and reverse URL resolution
//! - [`text`] - Display names, suffix stripping, camel-case helpers
//! - [`i18n`] - Translation catalog and lazy translation strings
//! - [`apps`] - Application-label derivation from module paths
//! - [`settings`] - Environment-driven site settings
//! - [`logging`] - Tracing-based logging integration

pub mod apps;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod principal;
pub mod routes;
pub mod settings;
pub mod text;

// Re-export the most commonly used types at the crate root.
pub use error::{BackofficeError, BackofficeResult, ValidationError};
pub use principal::Principal;
pub use routes::RouteTable;
pub use text::DisplayName;
