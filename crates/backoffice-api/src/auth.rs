//! Session-backed authentication for the admin API.
//!
//! Passwords are hashed with Argon2id; the CPU-bound work runs on the
//! blocking pool. Sessions store the username plus a fragment of the
//! password hash, so changing a password invalidates every other session
//! for that user while the current one can be kept alive by refreshing its
//! fragment.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use tokio::sync::RwLock;

use backoffice_core::error::{BackofficeError, BackofficeResult};
use backoffice_core::principal::Principal;
use backoffice_core::settings::SiteSettings;

/// Length of the session key.
const SESSION_KEY_LEN: usize = 32;

/// Length of the password-hash fragment stored in the session.
const AUTH_HASH_LEN: usize = 40;

/// A stored user account.
#[derive(Debug, Clone)]
pub struct StoredUser {
    /// The unique username.
    pub username: String,
    /// The email address.
    pub email: String,
    /// The first name.
    pub first_name: String,
    /// The last name.
    pub last_name: String,
    /// Whether the account is active.
    pub is_active: bool,
    /// Whether the account may use the admin.
    pub is_staff: bool,
    /// Whether the account bypasses permission checks.
    pub is_superuser: bool,
    /// The encoded Argon2id password hash.
    pub password_hash: String,
    /// Granted permissions, `"app_label.codename"` each.
    pub permissions: Vec<String>,
}

impl StoredUser {
    /// Builds the principal this account resolves to.
    pub fn to_principal(&self) -> Principal {
        let mut principal = Principal::new(&self.username, &self.email);
        principal.first_name = self.first_name.clone();
        principal.last_name = self.last_name.clone();
        principal.is_active = self.is_active;
        principal.is_staff = self.is_staff;
        principal.is_superuser = self.is_superuser;
        principal.permissions = self.permissions.clone();
        principal
    }
}

/// Hashes a password with Argon2id on the blocking pool.
///
/// # Errors
///
/// Returns an internal error if hashing fails or the blocking task is
/// cancelled.
pub async fn hash_password(password: &str) -> BackofficeResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        use argon2::password_hash::{rand_core::OsRng, PasswordHasher as _, SaltString};
        use argon2::Argon2;

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| BackofficeError::Internal(format!("Argon2 hash error: {e}")))?;
        Ok(hash.to_string())
    })
    .await
    .map_err(|e| BackofficeError::Internal(format!("Task join error: {e}")))?
}

/// Verifies a password against an encoded hash on the blocking pool.
///
/// # Errors
///
/// Returns an internal error if the hash cannot be parsed or the blocking
/// task is cancelled.
pub async fn verify_password(password: &str, hash: &str) -> BackofficeResult<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || {
        use argon2::password_hash::{PasswordHash, PasswordVerifier};
        use argon2::Argon2;

        let parsed = PasswordHash::new(&hash)
            .map_err(|e| BackofficeError::Internal(format!("Invalid password hash: {e}")))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| BackofficeError::Internal(format!("Task join error: {e}")))?
}

/// Returns the fragment of a password hash stored with each session.
pub fn session_auth_hash(password_hash: &str) -> String {
    password_hash.chars().take(AUTH_HASH_LEN).collect()
}

/// Storage of user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks up a user by username.
    async fn get(&self, username: &str) -> Option<StoredUser>;

    /// Replaces a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns [`BackofficeError::NotFound`] for an unknown username.
    async fn set_password_hash(&self, username: &str, password_hash: &str)
        -> BackofficeResult<()>;
}

/// An in-memory user store.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, StoredUser>>,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a user, replacing any existing account with the username.
    pub async fn add_user(&self, user: StoredUser) {
        self.users.write().await.insert(user.username.clone(), user);
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get(&self, username: &str) -> Option<StoredUser> {
        self.users.read().await.get(username).cloned()
    }

    async fn set_password_hash(
        &self,
        username: &str,
        password_hash: &str,
    ) -> BackofficeResult<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(username).ok_or_else(|| {
            BackofficeError::NotFound(format!("No user named '{username}'"))
        })?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }
}

/// A live session.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    /// The authenticated username.
    pub username: String,
    /// The password-hash fragment at login time.
    pub auth_hash: String,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

/// Storage of sessions, keyed by the cookie value.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates a session and returns its key.
    async fn create(&self, username: &str, auth_hash: &str) -> String;

    /// Looks up a session.
    async fn get(&self, key: &str) -> Option<SessionRecord>;

    /// Deletes a session; unknown keys are ignored.
    async fn delete(&self, key: &str);

    /// Refreshes a session's password-hash fragment, keeping it valid
    /// across a password change.
    async fn update_auth_hash(&self, key: &str, auth_hash: &str);
}

/// An in-memory session store.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, username: &str, auth_hash: &str) -> String {
        let key: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_KEY_LEN)
            .map(char::from)
            .collect();
        let record = SessionRecord {
            username: username.to_string(),
            auth_hash: auth_hash.to_string(),
            created_at: Utc::now(),
        };
        self.sessions.write().await.insert(key.clone(), record);
        key
    }

    async fn get(&self, key: &str) -> Option<SessionRecord> {
        self.sessions.read().await.get(key).cloned()
    }

    async fn delete(&self, key: &str) {
        self.sessions.write().await.remove(key);
    }

    async fn update_auth_hash(&self, key: &str, auth_hash: &str) {
        if let Some(record) = self.sessions.write().await.get_mut(key) {
            record.auth_hash = auth_hash.to_string();
        }
    }
}

/// Shared stores and settings handed to every action handler.
pub struct ApiContext {
    /// The user store.
    pub users: std::sync::Arc<dyn UserStore>,
    /// The session store.
    pub sessions: std::sync::Arc<dyn SessionStore>,
    /// Site settings.
    pub settings: SiteSettings,
}

impl ApiContext {
    /// Creates a context over in-memory stores with default settings.
    pub fn in_memory() -> Self {
        Self {
            users: std::sync::Arc::new(InMemoryUserStore::new()),
            sessions: std::sync::Arc::new(InMemorySessionStore::new()),
            settings: SiteSettings::default(),
        }
    }
}

impl std::fmt::Debug for ApiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiContext").finish_non_exhaustive()
    }
}

/// Resolves a session key to a principal.
///
/// Unknown sessions, missing or inactive users, and sessions whose
/// password-hash fragment no longer matches all resolve to the anonymous
/// principal.
pub async fn resolve_principal(context: &ApiContext, session_key: Option<&str>) -> Principal {
    let Some(key) = session_key else {
        return Principal::anonymous();
    };
    let Some(record) = context.sessions.get(key).await else {
        return Principal::anonymous();
    };
    let Some(user) = context.users.get(&record.username).await else {
        return Principal::anonymous();
    };
    if !user.is_active || session_auth_hash(&user.password_hash) != record.auth_hash {
        return Principal::anonymous();
    }
    user.to_principal()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn stored_user(username: &str, password: &str) -> StoredUser {
        StoredUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: String::new(),
            last_name: String::new(),
            is_active: true,
            is_staff: true,
            is_superuser: false,
            password_hash: hash_password(password).await.unwrap(),
            permissions: Vec::new(),
        }
    }

    // ── Hashing ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("hunter2").await.unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter2", &hash).await.unwrap());
        assert!(!verify_password("wrong", &hash).await.unwrap());
    }

    #[test]
    fn test_session_auth_hash_truncates() {
        let long = "$argon2id$v=19$m=19456,t=2,p=1$abcdefghijklmnop$qrstuvwxyz1234567890";
        assert_eq!(session_auth_hash(long), &long[..40]);
        assert_eq!(session_auth_hash("short"), "short");
    }

    // ── Session resolution ──────────────────────────────────────────

    #[tokio::test]
    async fn test_resolve_principal_happy_path() {
        let user = stored_user("alice", "pass123").await;
        let fragment = session_auth_hash(&user.password_hash);

        let users = InMemoryUserStore::new();
        users.add_user(user).await;
        let context = ApiContext {
            users: std::sync::Arc::new(users),
            ..ApiContext::in_memory()
        };

        let key = context.sessions.create("alice", &fragment).await;
        let principal = resolve_principal(&context, Some(&key)).await;
        assert!(principal.is_authenticated);
        assert_eq!(principal.username, "alice");
    }

    #[tokio::test]
    async fn test_resolve_principal_no_session() {
        let context = ApiContext::in_memory();
        let principal = resolve_principal(&context, None).await;
        assert!(!principal.is_authenticated);
    }

    #[tokio::test]
    async fn test_resolve_principal_unknown_key() {
        let context = ApiContext::in_memory();
        let principal = resolve_principal(&context, Some("nope")).await;
        assert!(!principal.is_authenticated);
    }

    #[tokio::test]
    async fn test_resolve_principal_stale_auth_hash() {
        let users = InMemoryUserStore::new();
        let user = stored_user("bob", "old-password").await;
        users.add_user(user).await;

        let context = ApiContext {
            users: std::sync::Arc::new(users),
            ..ApiContext::in_memory()
        };

        let key = context.sessions.create("bob", "stale-fragment").await;
        let principal = resolve_principal(&context, Some(&key)).await;
        assert!(!principal.is_authenticated);
    }

    #[tokio::test]
    async fn test_resolve_principal_inactive_user() {
        let users = InMemoryUserStore::new();
        let mut user = stored_user("carol", "pw").await;
        user.is_active = false;
        let fragment = session_auth_hash(&user.password_hash);
        users.add_user(user).await;

        let context = ApiContext {
            users: std::sync::Arc::new(users),
            ..ApiContext::in_memory()
        };

        let key = context.sessions.create("carol", &fragment).await;
        let principal = resolve_principal(&context, Some(&key)).await;
        assert!(!principal.is_authenticated);
    }

    #[tokio::test]
    async fn test_update_auth_hash_keeps_session_alive() {
        let sessions = InMemorySessionStore::new();
        let key = sessions.create("dave", "fragment-1").await;
        sessions.update_auth_hash(&key, "fragment-2").await;
        assert_eq!(sessions.get(&key).await.unwrap().auth_hash, "fragment-2");
    }

    #[tokio::test]
    async fn test_delete_session() {
        let sessions = InMemorySessionStore::new();
        let key = sessions.create("erin", "fragment").await;
        sessions.delete(&key).await;
        assert!(sessions.get(&key).await.is_none());
    }
}
