//! Themed admin site for backoffice.
//!
//! Class-based admin views are registered on an [`AdminSite`](site::AdminSite)
//! through [`register`](register::register), which fabricates a synthetic
//! entity carrying the view's access permission. Dispatch is permission
//! gated: anonymous and under-privileged requests are redirected to the
//! login page indistinguishably.

pub mod entity;
pub mod guard;
pub mod model_admin;
pub mod register;
pub mod site;
pub mod tools;
pub mod view;

pub use entity::SyntheticEntity;
pub use model_admin::ModelAdminView;
pub use register::{register, register_with, RegisterOptions};
pub use site::AdminSite;
pub use tools::{LinkTarget, ViewTool};
pub use view::{AdminResponse, AdminViewSpec};
