//! Built-in endpoints: login, logout, current identity, password change,
//! and the translation catalog.
//!
//! All built-ins register under the `backoffice` application label so their
//! basenames (`backoffice.login`, `backoffice.me`, ...) never collide with
//! project endpoints.

use std::any::TypeId;

use serde_json::{json, Value};

use backoffice_core::error::{BackofficeResult, ValidationError};
use backoffice_core::i18n;
use backoffice_core::principal::Principal;
use backoffice_core::text::DisplayName;

use crate::auth::{hash_password, session_auth_hash, verify_password};
use crate::endpoint::{
    AccessPolicy, Action, AdminEndpoint, ApiRequest, ApiResponse, SessionDirective,
};
use crate::meta::{AdminOptions, EndpointInfo};

/// The application label all built-in endpoints register under.
const BUILTIN_APP_LABEL: &str = "backoffice";

/// Serializes a principal as the identity payload returned by login and
/// the `me` endpoint.
fn identity(principal: &Principal) -> Value {
    let mut permissions = principal.permissions.clone();
    permissions.sort_unstable();
    json!({
        "username": principal.username,
        "email": principal.email,
        "first_name": principal.first_name,
        "last_name": principal.last_name,
        "full_name": principal.full_name(),
        "is_staff": principal.is_staff,
        "is_superuser": principal.is_superuser,
        "permissions": permissions,
    })
}

/// Extracts a required string field, recording a field error when absent
/// or empty.
fn required_field<'a>(
    payload: &'a Value,
    field: &str,
    errors: &mut Option<ValidationError>,
) -> &'a str {
    let value = payload.get(field).and_then(Value::as_str).unwrap_or("");
    if value.is_empty() {
        let field_error = ValidationError::new("This field is required.", "required");
        *errors = Some(match errors.take() {
            Some(existing) => existing.and_field(field, field_error),
            None => ValidationError::for_field(field, field_error),
        });
    }
    value
}

// ── Login ───────────────────────────────────────────────────────────

/// `POST {prefix}/backoffice/login/` - session login.
///
/// Anonymous-only. Returns `200` with the identity payload on success or
/// `400` with field errors.
pub struct LoginEndpoint;

async fn handle_login(request: ApiRequest) -> BackofficeResult<ApiResponse> {
    let mut errors = None;
    let username = required_field(&request.payload, "username", &mut errors).to_string();
    let password = required_field(&request.payload, "password", &mut errors).to_string();
    if let Some(errors) = errors {
        return Err(errors.into());
    }

    let rejection = || {
        ValidationError::new(
            "Unable to log in with provided credentials.",
            "authorization",
        )
    };

    let Some(user) = request.context.users.get(&username).await else {
        return Err(rejection().into());
    };
    if !user.is_active || !verify_password(&password, &user.password_hash).await? {
        return Err(rejection().into());
    }

    let fragment = session_auth_hash(&user.password_hash);
    let key = request.context.sessions.create(&user.username, &fragment).await;
    tracing::info!(username = %user.username, "login");

    Ok(ApiResponse::ok(identity(&user.to_principal()))
        .session(SessionDirective::Establish(key)))
}

impl AdminEndpoint for LoginEndpoint {
    fn info(&self) -> EndpointInfo {
        EndpointInfo::new("LoginAPI", module_path!())
            .name(DisplayName::lazy("Log in"))
            .basename("login")
    }

    fn meta_key(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn admin(&self) -> AdminOptions {
        AdminOptions::new().app_label(BUILTIN_APP_LABEL)
    }

    fn access(&self) -> AccessPolicy {
        AccessPolicy::AnonymousOnly
    }

    fn actions(&self) -> Vec<Action> {
        vec![Action::create(handle_login)]
    }
}

// ── Logout ──────────────────────────────────────────────────────────

/// `POST {prefix}/backoffice/logout/` - session logout. Always `204`.
pub struct LogoutEndpoint;

async fn handle_logout(request: ApiRequest) -> BackofficeResult<ApiResponse> {
    if let Some(key) = &request.session_key {
        request.context.sessions.delete(key).await;
    }
    Ok(ApiResponse::no_content().session(SessionDirective::Clear))
}

impl AdminEndpoint for LogoutEndpoint {
    fn info(&self) -> EndpointInfo {
        EndpointInfo::new("LogoutAPI", module_path!())
            .name(DisplayName::lazy("Log out"))
            .basename("logout")
    }

    fn meta_key(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn admin(&self) -> AdminOptions {
        AdminOptions::new().app_label(BUILTIN_APP_LABEL)
    }

    fn access(&self) -> AccessPolicy {
        AccessPolicy::AllowAny
    }

    fn actions(&self) -> Vec<Action> {
        vec![Action::create(handle_logout)]
    }
}

// ── Me ──────────────────────────────────────────────────────────────

/// `GET {prefix}/backoffice/me/` - the calling principal's identity.
///
/// Staff-only; excluded from navigation.
pub struct MeEndpoint;

async fn handle_me(request: ApiRequest) -> BackofficeResult<ApiResponse> {
    Ok(ApiResponse::ok(identity(&request.principal)))
}

impl AdminEndpoint for MeEndpoint {
    fn info(&self) -> EndpointInfo {
        EndpointInfo::new("MeAPI", module_path!())
            .name(DisplayName::lazy("Me"))
            .basename("me")
    }

    fn meta_key(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn admin(&self) -> AdminOptions {
        AdminOptions::new()
            .app_label(BUILTIN_APP_LABEL)
            .exclude_tags(vec!["navigation"])
    }

    fn actions(&self) -> Vec<Action> {
        vec![Action::list(handle_me)]
    }
}

// ── Change password ─────────────────────────────────────────────────

/// `POST {prefix}/backoffice/change_password/` - password change.
///
/// Validates the old password and the confirmation pair; on success the
/// stored hash is replaced and the current session's auth fragment is
/// refreshed, which invalidates every other session for the user while
/// keeping this one alive. Returns `204`, or `400` with field errors.
pub struct ChangePasswordEndpoint;

async fn handle_change_password(request: ApiRequest) -> BackofficeResult<ApiResponse> {
    let mut errors = None;
    let old_password = required_field(&request.payload, "old_password", &mut errors).to_string();
    let new_password1 = required_field(&request.payload, "new_password1", &mut errors).to_string();
    let new_password2 = required_field(&request.payload, "new_password2", &mut errors).to_string();
    if let Some(errors) = errors {
        return Err(errors.into());
    }

    let username = request.principal.username.clone();
    let Some(user) = request.context.users.get(&username).await else {
        return Err(ValidationError::new("Unknown account.", "invalid").into());
    };

    let mut validation: Option<ValidationError> = None;
    if !verify_password(&old_password, &user.password_hash).await? {
        let err = ValidationError::new(
            "Your old password was entered incorrectly. Please enter it again.",
            "password_incorrect",
        );
        validation = Some(ValidationError::for_field("old_password", err));
    }
    if new_password1 != new_password2 {
        let err = ValidationError::new(
            "The two password fields didn't match.",
            "password_mismatch",
        );
        validation = Some(match validation.take() {
            Some(existing) => existing.and_field("new_password2", err),
            None => ValidationError::for_field("new_password2", err),
        });
    }
    if let Some(validation) = validation {
        return Err(validation.into());
    }

    let new_hash = hash_password(&new_password1).await?;
    request
        .context
        .users
        .set_password_hash(&username, &new_hash)
        .await?;

    // Other sessions carry the old fragment and resolve to anonymous from
    // now on; the current session is refreshed so it survives.
    if let Some(key) = &request.session_key {
        request
            .context
            .sessions
            .update_auth_hash(key, &session_auth_hash(&new_hash))
            .await;
    }
    tracing::info!(username = %username, "password changed");

    Ok(ApiResponse::no_content())
}

impl AdminEndpoint for ChangePasswordEndpoint {
    fn info(&self) -> EndpointInfo {
        EndpointInfo::new("ChangePasswordAPI", module_path!())
            .name(DisplayName::lazy("Change password"))
            .basename("change_password")
    }

    fn meta_key(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn admin(&self) -> AdminOptions {
        AdminOptions::new().app_label(BUILTIN_APP_LABEL)
    }

    fn actions(&self) -> Vec<Action> {
        vec![Action::create(handle_change_password)]
    }
}

// ── Translations ────────────────────────────────────────────────────

/// `GET {prefix}/backoffice/i18n/` - the translation catalog for the
/// active language.
///
/// Open to anyone; excluded from navigation.
pub struct TranslationEndpoint;

async fn handle_translations(_request: ApiRequest) -> BackofficeResult<ApiResponse> {
    let language = i18n::get_language();
    let catalog: serde_json::Map<String, Value> = i18n::catalog::raw_catalog(&language)
        .into_iter()
        .map(|(msgid, translated)| (msgid, Value::String(translated)))
        .collect();
    Ok(ApiResponse::ok(json!({
        "language": language,
        "catalog": catalog,
    })))
}

impl AdminEndpoint for TranslationEndpoint {
    fn info(&self) -> EndpointInfo {
        EndpointInfo::new("TranslationAPI", module_path!())
            .name(DisplayName::lazy("Translations"))
            .basename("i18n")
    }

    fn meta_key(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn admin(&self) -> AdminOptions {
        AdminOptions::new()
            .app_label(BUILTIN_APP_LABEL)
            .exclude_tags(vec!["navigation"])
    }

    fn access(&self) -> AccessPolicy {
        AccessPolicy::AllowAny
    }

    fn actions(&self) -> Vec<Action> {
        vec![Action::list(handle_translations)]
    }
}

/// Registers all built-in endpoints on a router.
///
/// # Errors
///
/// Propagates registration failures; a project endpoint squatting on a
/// `backoffice.*` basename surfaces here.
pub fn register_builtins(router: &mut crate::router::ApiRouter) -> BackofficeResult<()> {
    use std::sync::Arc;

    router.register(Arc::new(LoginEndpoint))?;
    router.register(Arc::new(LogoutEndpoint))?;
    router.register(Arc::new(MeEndpoint))?;
    router.register(Arc::new(ChangePasswordEndpoint))?;
    router.register(Arc::new(TranslationEndpoint))?;
    Ok(())
}
