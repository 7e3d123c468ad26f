//! The endpoint abstraction.
//!
//! An [`AdminEndpoint`] declares its identity ([`EndpointInfo`]), admin
//! overrides, access policy, and a list of [`Action`]s. The router derives
//! metadata once, mounts the actions, and dispatches requests through the
//! action handlers.

use std::any::TypeId;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use http::{Method, StatusCode};
use serde_json::Value;

use backoffice_core::error::BackofficeResult;
use backoffice_core::principal::Principal;

use crate::auth::ApiContext;
use crate::meta::{AdminOptions, EndpointInfo};
use crate::tags::TagHints;

/// Who may call an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessPolicy {
    /// Active staff members only. The default.
    #[default]
    StaffOnly,
    /// Anonymous principals only (the login endpoint).
    AnonymousOnly,
    /// No restriction.
    AllowAny,
}

impl AccessPolicy {
    /// Returns whether the policy admits the principal.
    pub const fn permits(self, principal: &Principal) -> bool {
        match self {
            Self::StaffOnly => {
                principal.is_authenticated && principal.is_active && principal.is_staff
            }
            Self::AnonymousOnly => !principal.is_authenticated,
            Self::AllowAny => true,
        }
    }
}

/// The shape of an action, driving URL layout and schema assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// `GET` on the collection.
    List,
    /// `POST` on the collection.
    Create,
    /// `GET` on a single object.
    Retrieve,
    /// `PUT` on a single object.
    Update,
    /// `PATCH` on a single object.
    PartialUpdate,
    /// `DELETE` on a single object.
    Destroy,
    /// Anything else, mounted under the action name.
    Custom,
}

/// What the router should do with the caller's session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionDirective {
    /// Leave the session alone.
    #[default]
    Keep,
    /// Establish a new session with this key.
    Establish(String),
    /// Clear the session cookie.
    Clear,
}

/// The request an action handler receives.
#[derive(Clone)]
pub struct ApiRequest {
    /// The resolved principal.
    pub principal: Principal,
    /// The caller's session key, if a session cookie was presented.
    pub session_key: Option<String>,
    /// The parsed JSON payload; `Null` for an empty body.
    pub payload: Value,
    /// Shared stores and settings.
    pub context: Arc<ApiContext>,
}

/// The response an action handler produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// The HTTP status.
    pub status: StatusCode,
    /// The JSON body, if any.
    pub body: Option<Value>,
    /// Session handling for the router.
    pub session: SessionDirective,
}

impl ApiResponse {
    /// A `200 OK` with a JSON body.
    pub const fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: Some(body),
            session: SessionDirective::Keep,
        }
    }

    /// A `204 No Content`.
    pub const fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: None,
            session: SessionDirective::Keep,
        }
    }

    /// Attaches a session directive.
    #[must_use]
    pub fn session(mut self, directive: SessionDirective) -> Self {
        self.session = directive;
        self
    }
}

/// The boxed future an action handler returns.
pub type HandlerFuture = Pin<Box<dyn Future<Output = BackofficeResult<ApiResponse>> + Send>>;

/// An action handler.
pub type ActionHandler = Arc<dyn Fn(ApiRequest) -> HandlerFuture + Send + Sync>;

/// A single operation an endpoint exposes.
#[derive(Clone)]
pub struct Action {
    /// The action name (`"list"`, `"create"`, or a custom name).
    pub name: String,
    /// The HTTP method.
    pub method: Method,
    /// The action kind.
    pub kind: ActionKind,
    /// Whether the action targets a single object (`/<pk>/` URL).
    pub detail: bool,
    /// An explicit schema title, taking precedence over derivation.
    pub title: Option<String>,
    /// Tag hints applied during schema assembly.
    pub tags: TagHints,
    /// The handler invoked on dispatch.
    pub handler: ActionHandler,
}

impl Action {
    /// Creates an action with the conventional detail flag for its kind.
    pub fn new<F, Fut>(name: impl Into<String>, method: Method, kind: ActionKind, f: F) -> Self
    where
        F: Fn(ApiRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = BackofficeResult<ApiResponse>> + Send + 'static,
    {
        let detail = matches!(
            kind,
            ActionKind::Retrieve | ActionKind::Update | ActionKind::PartialUpdate | ActionKind::Destroy
        );
        Self {
            name: name.into(),
            method,
            kind,
            detail,
            title: None,
            tags: TagHints::new(),
            handler: Arc::new(move |request| Box::pin(f(request))),
        }
    }

    /// A `list` action (`GET` on the collection).
    pub fn list<F, Fut>(f: F) -> Self
    where
        F: Fn(ApiRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = BackofficeResult<ApiResponse>> + Send + 'static,
    {
        Self::new("list", Method::GET, ActionKind::List, f)
    }

    /// A `create` action (`POST` on the collection).
    pub fn create<F, Fut>(f: F) -> Self
    where
        F: Fn(ApiRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = BackofficeResult<ApiResponse>> + Send + 'static,
    {
        Self::new("create", Method::POST, ActionKind::Create, f)
    }

    /// A `retrieve` action (`GET` on a single object).
    pub fn retrieve<F, Fut>(f: F) -> Self
    where
        F: Fn(ApiRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = BackofficeResult<ApiResponse>> + Send + 'static,
    {
        Self::new("retrieve", Method::GET, ActionKind::Retrieve, f)
    }

    /// Marks the action as targeting a single object.
    #[must_use]
    pub const fn detail(mut self) -> Self {
        self.detail = true;
        self
    }

    /// Sets an explicit schema title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the tag hints.
    #[must_use]
    pub fn tags(mut self, tags: TagHints) -> Self {
        self.tags = tags;
        self
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("method", &self.method)
            .field("kind", &self.kind)
            .field("detail", &self.detail)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

/// An endpoint mountable on the API router.
pub trait AdminEndpoint: Send + Sync + 'static {
    /// The endpoint's declared identity.
    fn info(&self) -> EndpointInfo;

    /// The cache key for derived metadata. Implementations return
    /// `TypeId::of::<Self>()`.
    fn meta_key(&self) -> TypeId;

    /// Admin overrides; none by default.
    fn admin(&self) -> AdminOptions {
        AdminOptions::new()
    }

    /// The access policy; staff-only by default.
    fn access(&self) -> AccessPolicy {
        AccessPolicy::default()
    }

    /// An extra permission required on top of the access policy.
    fn required_permission(&self) -> Option<String> {
        None
    }

    /// The actions this endpoint exposes.
    fn actions(&self) -> Vec<Action>;

    /// Whether the endpoint is a full-CRUD family, earning the `crud` tag.
    fn is_crud(&self) -> bool {
        false
    }
}

/// Runs the full access check for an endpoint: policy first, then the
/// extra permission if one is declared.
pub fn endpoint_permits(endpoint: &dyn AdminEndpoint, principal: &Principal) -> bool {
    endpoint.access().permits(principal)
        && endpoint
            .required_permission()
            .map_or(true, |perm| principal.has_perm(&perm))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff() -> Principal {
        Principal::new("staff", "staff@example.com").staff()
    }

    // ── AccessPolicy ────────────────────────────────────────────────

    #[test]
    fn test_staff_only_rejects_anonymous() {
        assert!(!AccessPolicy::StaffOnly.permits(&Principal::anonymous()));
        assert!(AccessPolicy::StaffOnly.permits(&staff()));
    }

    #[test]
    fn test_staff_only_rejects_plain_user() {
        let user = Principal::new("user", "user@example.com");
        assert!(!AccessPolicy::StaffOnly.permits(&user));
    }

    #[test]
    fn test_anonymous_only_rejects_authenticated() {
        assert!(AccessPolicy::AnonymousOnly.permits(&Principal::anonymous()));
        assert!(!AccessPolicy::AnonymousOnly.permits(&staff()));
    }

    #[test]
    fn test_allow_any() {
        assert!(AccessPolicy::AllowAny.permits(&Principal::anonymous()));
        assert!(AccessPolicy::AllowAny.permits(&staff()));
    }

    // ── Action ──────────────────────────────────────────────────────

    #[test]
    fn test_action_detail_defaults() {
        let list = Action::list(|_req| async { Ok(ApiResponse::no_content()) });
        assert!(!list.detail);
        assert_eq!(list.method, Method::GET);

        let retrieve = Action::retrieve(|_req| async { Ok(ApiResponse::no_content()) });
        assert!(retrieve.detail);
    }

    #[test]
    fn test_custom_action_not_detail_by_default() {
        let action = Action::new("send_invoice", Method::POST, ActionKind::Custom, |_req| async {
            Ok(ApiResponse::no_content())
        });
        assert!(!action.detail);
        assert!(action.detail().detail);
    }

    // ── endpoint_permits ────────────────────────────────────────────

    struct GatedEndpoint;

    impl AdminEndpoint for GatedEndpoint {
        fn info(&self) -> EndpointInfo {
            EndpointInfo::new("GatedEndpoint", "gatehouse::api")
        }

        fn meta_key(&self) -> TypeId {
            TypeId::of::<Self>()
        }

        fn required_permission(&self) -> Option<String> {
            Some("gatehouse.can_enter".to_string())
        }

        fn actions(&self) -> Vec<Action> {
            vec![Action::list(|_req| async { Ok(ApiResponse::no_content()) })]
        }
    }

    #[test]
    fn test_endpoint_permits_requires_both_checks() {
        let endpoint = GatedEndpoint;
        let without_perm = staff();
        let with_perm = staff().with_perm("gatehouse.can_enter");

        assert!(!endpoint_permits(&endpoint, &without_perm));
        assert!(endpoint_permits(&endpoint, &with_perm));
        assert!(!endpoint_permits(&endpoint, &Principal::anonymous()));
    }
}
