//! The admin REST API: endpoint registration, metadata derivation,
//! permission-gated dispatch, schema assembly, and navigation.
//!
//! An [`AdminEndpoint`] declares what it is and what it does; the
//! [`ApiRouter`] derives its metadata, mounts its actions under a
//! versioned prefix, and serves the navigation listing and the schema
//! document alongside them. Session authentication and the built-in
//! login, logout, me, change-password, and translation endpoints live
//! here too.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use backoffice_api::auth::ApiContext;
//! use backoffice_api::router::ApiRouter;
//! use backoffice_api::views::register_builtins;
//!
//! # fn main() -> backoffice_core::error::BackofficeResult<()> {
//! let mut router = ApiRouter::new("admin", "v1.0", Arc::new(ApiContext::in_memory()));
//! register_builtins(&mut router)?;
//! let app = router.into_axum_router();
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod endpoint;
pub mod meta;
pub mod navigation;
pub mod router;
pub mod schema;
pub mod tags;
pub mod views;

pub use auth::{
    resolve_principal, session_auth_hash, ApiContext, InMemorySessionStore, InMemoryUserStore,
    SessionStore, StoredUser, UserStore,
};
pub use endpoint::{
    endpoint_permits, AccessPolicy, Action, ActionKind, AdminEndpoint, ApiRequest, ApiResponse,
    SessionDirective,
};
pub use meta::{derive, AdminOptions, EndpointInfo, EndpointMeta, MetaRegistry, Override};
pub use navigation::{list_navigation, NavigationEntry};
pub use router::{ApiRouter, RegisteredEndpoint};
pub use schema::SchemaAssembler;
pub use tags::TagHints;
pub use views::register_builtins;
