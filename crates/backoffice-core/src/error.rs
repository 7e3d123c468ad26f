//! Core error types for the backoffice toolkit.
//!
//! This module provides the [`BackofficeError`] enum covering HTTP-level
//! rejections, validation failures, configuration errors, and route
//! resolution failures, along with a [`ValidationError`] type that can carry
//! per-field error detail.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Represents a validation error with optional field-level errors.
///
/// Validation errors can be either simple (a single message) or compound
/// (containing per-field error lists). Compound errors are what the API
/// surfaces as a structured 400 body.
///
/// # Examples
///
/// ```
/// use backoffice_core::error::ValidationError;
///
/// // Simple validation error
/// let err = ValidationError::new("This field is required.", "required");
///
/// // Field-level validation errors
/// let err = ValidationError::for_field(
///     "email",
///     ValidationError::new("Invalid email address.", "invalid"),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The primary error message.
    pub message: String,
    /// A short code identifying the type of failure (e.g. "required", "invalid").
    pub code: String,
    /// Per-field validation errors, keyed by field name.
    pub field_errors: HashMap<String, Vec<Self>>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            field_errors: HashMap::new(),
        }
    }

    /// Creates a `ValidationError` containing per-field errors.
    pub fn with_field_errors(field_errors: HashMap<String, Vec<Self>>) -> Self {
        Self {
            message: String::new(),
            code: String::new(),
            field_errors,
        }
    }

    /// Creates a `ValidationError` for a single field.
    pub fn for_field(field: impl Into<String>, error: Self) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.into(), vec![error]);
        Self::with_field_errors(field_errors)
    }

    /// Adds an error for a field, keeping any existing ones.
    #[must_use]
    pub fn and_field(mut self, field: impl Into<String>, error: Self) -> Self {
        self.field_errors.entry(field.into()).or_default().push(error);
        self
    }

    /// Returns the error body as JSON: field name -> list of messages.
    ///
    /// Non-field errors are keyed under `"non_field_errors"`.
    pub fn as_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        if !self.message.is_empty() {
            map.insert(
                "non_field_errors".to_string(),
                serde_json::json!([self.message]),
            );
        }
        for (field, errors) in &self.field_errors {
            let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
            map.insert(field.clone(), serde_json::json!(messages));
        }
        serde_json::Value::Object(map)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            write!(f, "{}", self.message)?;
        } else {
            let mut first = true;
            for (field, errors) in &self.field_errors {
                for error in errors {
                    if !first {
                        write!(f, "; ")?;
                    }
                    write!(f, "{field}: {error}")?;
                    first = false;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for the backoffice toolkit.
///
/// Configuration errors are fatal and raised at registration/startup time.
/// Permission denial and route-resolution failure are routine control-flow
/// outcomes, carried as error values so callers can branch on them.
///
/// Each variant maps to an HTTP status code via
/// [`BackofficeError::status_code`].
#[derive(Error, Debug)]
pub enum BackofficeError {
    // ── Request rejections ───────────────────────────────────────────

    /// HTTP 400 Bad Request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// HTTP 401 Unauthorized.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// HTTP 403 Forbidden / Permission Denied.
    ///
    /// Routine filtering outcome, never logged as an exception.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// HTTP 404 Not Found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP 405 Method Not Allowed.
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    // ── Validation ───────────────────────────────────────────────────

    /// One or more fields failed validation.
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    // ── Routing ──────────────────────────────────────────────────────

    /// No route matched a reverse lookup.
    ///
    /// Recoverable per-entry during navigation aggregation; the aggregate
    /// continues past it.
    #[error("Reverse for '{0}' not found")]
    NoReverseMatch(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The toolkit is improperly configured (malformed module path,
    /// duplicate basename, duplicate registration).
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    // ── Internal ─────────────────────────────────────────────────────

    /// HTTP 500 Internal Server Error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl BackofficeError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `BadRequest`, `Validation` -> 400
    /// - `Unauthorized` -> 401
    /// - `PermissionDenied` -> 403
    /// - `NotFound`, `NoReverseMatch` -> 404
    /// - `MethodNotAllowed` -> 405
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::PermissionDenied(_) => 403,
            Self::NotFound(_) | Self::NoReverseMatch(_) => 404,
            Self::MethodNotAllowed(_) => 405,
            Self::ConfigurationError(_) | Self::ImproperlyConfigured(_) | Self::Internal(_) => 500,
        }
    }
}

impl From<ValidationError> for BackofficeError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

/// A convenience type alias for `Result<T, BackofficeError>`.
pub type BackofficeResult<T> = Result<T, BackofficeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_simple() {
        let err = ValidationError::new("This field is required.", "required");
        assert_eq!(err.to_string(), "This field is required.");
    }

    #[test]
    fn test_validation_error_display_field_errors() {
        let err = ValidationError::for_field(
            "email",
            ValidationError::new("Invalid email.", "invalid"),
        );
        assert!(err.to_string().contains("email: Invalid email."));
    }

    #[test]
    fn test_validation_error_and_field() {
        let err = ValidationError::for_field(
            "old_password",
            ValidationError::new("Wrong password.", "password_incorrect"),
        )
        .and_field(
            "new_password2",
            ValidationError::new("Mismatch.", "password_mismatch"),
        );
        assert_eq!(err.field_errors.len(), 2);
    }

    #[test]
    fn test_validation_error_as_json() {
        let err = ValidationError::for_field(
            "username",
            ValidationError::new("This field is required.", "required"),
        );
        let json = err.as_json();
        assert_eq!(json["username"][0], "This field is required.");
    }

    #[test]
    fn test_validation_error_as_json_non_field() {
        let err = ValidationError::new("Invalid credentials.", "invalid_login");
        let json = err.as_json();
        assert_eq!(json["non_field_errors"][0], "Invalid credentials.");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(BackofficeError::BadRequest("x".into()).status_code(), 400);
        assert_eq!(BackofficeError::Unauthorized("x".into()).status_code(), 401);
        assert_eq!(
            BackofficeError::PermissionDenied("x".into()).status_code(),
            403
        );
        assert_eq!(BackofficeError::NotFound("x".into()).status_code(), 404);
        assert_eq!(
            BackofficeError::NoReverseMatch("x".into()).status_code(),
            404
        );
        assert_eq!(
            BackofficeError::MethodNotAllowed("x".into()).status_code(),
            405
        );
        assert_eq!(
            BackofficeError::Validation(ValidationError::new("x", "y")).status_code(),
            400
        );
        assert_eq!(
            BackofficeError::ImproperlyConfigured("x".into()).status_code(),
            500
        );
        assert_eq!(BackofficeError::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn test_validation_error_conversion() {
        let err: BackofficeError = ValidationError::new("bad", "invalid").into();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_no_reverse_match_display() {
        let err = BackofficeError::NoReverseMatch("fruit.apple-list".into());
        assert_eq!(err.to_string(), "Reverse for 'fruit.apple-list' not found");
    }
}
