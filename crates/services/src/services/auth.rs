use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use db::models::{profile::Profile, user::User};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{info, warn};
use ts_rs::TS;
use uuid::Uuid;

use super::error::StoreError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("only the administrator can sign in")]
    NotAdministrator,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("password must be at least 8 characters")]
    WeakPassword,
    #[error("email is already registered")]
    AlreadyRegistered,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("access denied")]
    AccessDenied,
    #[error("unknown or expired session")]
    UnknownSession,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Store(StoreError::from(err))
    }
}

/// In-memory session. Sessions do not survive a restart, mirroring the
/// provider-held transient state of the source system.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Session {
    pub token: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Session-change notifications, the analog of the provider's auth state
/// listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AuthEvent {
    SignedIn { user_id: Uuid },
    SignedOut { user_id: Uuid },
}

/// Route guard outcome. `Checking` is not modeled: the guard is evaluated per
/// request, after session state has resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
pub enum GuardDecision {
    Authorized,
    RedirectLogin,
    RedirectHome,
}

#[derive(Clone)]
pub struct AuthService {
    pool: SqlitePool,
    admin_email: String,
    sessions: Arc<DashMap<Uuid, Session>>,
    tx: broadcast::Sender<AuthEvent>,
}

impl AuthService {
    pub fn new(pool: SqlitePool, admin_email: impl Into<String>) -> Self {
        let (tx, _) = broadcast::channel(64);
        Self {
            pool,
            admin_email: admin_email.into().to_ascii_lowercase(),
            sessions: Arc::new(DashMap::new()),
            tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.tx.subscribe()
    }

    /// Create the administrator account. Rejected locally, before any store
    /// access, for every other address.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Uuid, AuthError> {
        let email = normalize_email(email)?;
        if email != self.admin_email {
            return Err(AuthError::NotAdministrator);
        }
        if password.len() < 8 {
            return Err(AuthError::WeakPassword);
        }
        if User::find_by_email(&self.pool, &email).await?.is_some() {
            return Err(AuthError::AlreadyRegistered);
        }

        let user = User::create(&self.pool, Uuid::new_v4(), &email, &hash_password(password)).await?;
        info!(user_id = %user.id, "administrator account created");
        Ok(user.id)
    }

    /// Password sign-in. The admin pre-check short-circuits before touching
    /// the store; after credentials verify, the persisted profile flag decides
    /// authorization and a non-admin session is terminated on the spot.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = normalize_email(email)?;
        if email != self.admin_email {
            return Err(AuthError::NotAdministrator);
        }

        let user = User::find_by_email(&self.pool, &email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let profile = match Profile::find_by_id(&self.pool, user.id).await? {
            Some(profile) => profile,
            None => {
                // Lazy profile creation; the email match seeds the flag.
                let full_name = email.split('@').next().unwrap_or(&email).to_string();
                Profile::create(&self.pool, user.id, &full_name, email == self.admin_email).await?
            }
        };

        if !profile.is_admin {
            warn!(user_id = %user.id, "sign-in by non-admin profile; terminating session");
            let _ = self.tx.send(AuthEvent::SignedOut { user_id: user.id });
            return Err(AuthError::AccessDenied);
        }

        let session = Session {
            token: Uuid::new_v4(),
            user_id: user.id,
            email: user.email.clone(),
            created_at: Utc::now(),
        };
        self.sessions.insert(session.token, session.clone());
        let _ = self.tx.send(AuthEvent::SignedIn { user_id: user.id });
        info!(user_id = %user.id, "signed in");
        Ok(session)
    }

    /// Local session state is cleared unconditionally; there is nothing
    /// downstream that can veto a sign-out.
    pub fn sign_out(&self, token: Uuid) {
        if let Some((_, session)) = self.sessions.remove(&token) {
            let _ = self.tx.send(AuthEvent::SignedOut { user_id: session.user_id });
            info!(user_id = %session.user_id, "signed out");
        }
    }

    pub fn session(&self, token: Uuid) -> Option<Session> {
        self.sessions.get(&token).map(|s| s.clone())
    }

    pub async fn is_admin(&self, token: Uuid) -> Result<bool, AuthError> {
        let session = self.session(token).ok_or(AuthError::UnknownSession)?;
        let profile = Profile::find_by_id(&self.pool, session.user_id).await?;
        Ok(profile.map(|p| p.is_admin).unwrap_or(false))
    }

    /// Route guard for the admin area. Re-evaluated on every request, so a
    /// flag revoked mid-session takes effect on the next hit: the session is
    /// terminated and the visitor is sent to the public home page.
    pub async fn guard(&self, token: Option<Uuid>) -> Result<GuardDecision, AuthError> {
        let Some(session) = token.and_then(|t| self.session(t)) else {
            return Ok(GuardDecision::RedirectLogin);
        };

        let profile = Profile::find_by_id(&self.pool, session.user_id).await?;
        if profile.map(|p| p.is_admin).unwrap_or(false) {
            Ok(GuardDecision::Authorized)
        } else {
            self.sign_out(session.token);
            Ok(GuardDecision::RedirectHome)
        }
    }
}

fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_ascii_lowercase();
    // Required-field check plus the same shape rule the source auth form used.
    if email.is_empty() || !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(AuthError::InvalidEmail);
    }
    Ok(email)
}

/// Salted SHA-256, stored as `base64(salt)$base64(digest)`.
fn hash_password(password: &str) -> String {
    let salt: [u8; 16] = rand::random();
    let digest = digest_with_salt(&salt, password);
    format!("{}${}", BASE64.encode(salt), BASE64.encode(digest))
}

fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_b64, digest_b64)) = stored.split_once('$') else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (BASE64.decode(salt_b64), BASE64.decode(digest_b64)) else {
        return false;
    };
    digest_with_salt(&salt, password).as_slice() == expected.as_slice()
}

fn digest_with_salt(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let stored = hash_password("correct horse");
        assert!(verify_password("correct horse", &stored));
        assert!(!verify_password("wrong horse", &stored));
    }

    #[test]
    fn malformed_hashes_never_verify() {
        assert!(!verify_password("x", "not-a-hash"));
        assert!(!verify_password("x", "a$b"));
    }

    #[test]
    fn email_normalization() {
        assert_eq!(normalize_email(" Admin@Example.COM ").unwrap(), "admin@example.com");
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("").is_err());
    }
}
