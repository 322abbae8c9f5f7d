//! Session authentication
//!
//! A `Session` is the explicit identity value handed to anything that needs
//! the current user or role. Expiry is always judged against an injected clock.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use pd_core::clock::Clock;
use pd_core::config::AuthConfig;
use pd_models::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found")]
    NotFound,
}

/// Session data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session ID stored in the cookie
    pub id: String,
    /// User ID assigned by the identity provider
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Start a session that lasts `lifetime_seconds` from the clock's now
    pub fn new(
        user_id: Uuid,
        email: impl Into<String>,
        role: Role,
        lifetime_seconds: i64,
        clock: &dyn Clock,
    ) -> Self {
        let now = clock.now();
        Self {
            id: generate_token(SESSION_ID_LENGTH),
            user_id,
            email: email.into(),
            role,
            created_at: now,
            expires_at: now + Duration::seconds(lifetime_seconds),
        }
    }

    /// Check if the session is still valid
    pub fn is_valid(&self, clock: &dyn Clock) -> bool {
        clock.now() < self.expires_at
    }
}

const SESSION_ID_LENGTH: usize = 64;

/// Random alphanumeric token
pub(crate) fn generate_token(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Session store trait for different backends
pub trait SessionStore: Send + Sync {
    /// Get a live session by ID; expired sessions are not returned
    fn get(&self, session_id: &str) -> Option<Session>;

    /// Store a session
    fn insert(&self, session: Session) -> Result<(), SessionError>;

    /// Delete a session; `NotFound` if it was already gone
    fn delete(&self, session_id: &str) -> Result<(), SessionError>;

    /// Clean up expired sessions
    fn cleanup_expired(&self) -> Result<usize, SessionError>;
}

/// In-memory session store
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    clock: Arc<dyn Clock>,
}

impl MemorySessionStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            clock,
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, session_id: &str) -> Option<Session> {
        let sessions = self.sessions.read();
        sessions
            .get(session_id)
            .filter(|s| s.is_valid(self.clock.as_ref()))
            .cloned()
    }

    fn insert(&self, session: Session) -> Result<(), SessionError> {
        self.sessions.write().insert(session.id.clone(), session);
        Ok(())
    }

    fn delete(&self, session_id: &str) -> Result<(), SessionError> {
        self.sessions
            .write()
            .remove(session_id)
            .map(|_| ())
            .ok_or(SessionError::NotFound)
    }

    fn cleanup_expired(&self) -> Result<usize, SessionError> {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        let clock = self.clock.as_ref();
        sessions.retain(|_, s| s.is_valid(clock));
        Ok(before - sessions.len())
    }
}

/// Cookie configuration for sessions
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub max_age: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "_dashboard_session".to_string(),
            path: "/".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            max_age: None,
        }
    }
}

impl CookieConfig {
    pub fn from_config(auth: &AuthConfig) -> Self {
        Self {
            name: auth.cookie_name.clone(),
            secure: auth.secure_cookies,
            max_age: Some(auth.session_lifetime_seconds),
            ..Default::default()
        }
    }

    /// Build the `Set-Cookie` header value
    pub fn build_cookie(&self, session_id: &str) -> String {
        let mut parts = vec![
            format!("{}={}", self.name, session_id),
            format!("Path={}", self.path),
        ];

        if self.secure {
            parts.push("Secure".to_string());
        }

        if self.http_only {
            parts.push("HttpOnly".to_string());
        }

        parts.push(
            match self.same_site {
                SameSite::Strict => "SameSite=Strict",
                SameSite::Lax => "SameSite=Lax",
                SameSite::None => "SameSite=None",
            }
            .to_string(),
        );

        if let Some(max_age) = self.max_age {
            parts.push(format!("Max-Age={}", max_age));
        }

        parts.join("; ")
    }

    /// Build the `Set-Cookie` header value that clears the session
    pub fn build_clear_cookie(&self) -> String {
        format!("{}=; Path={}; Max-Age=0; HttpOnly", self.name, self.path)
    }
}

/// Extract session ID from a `Cookie` header
pub fn extract_session_id(cookie_header: &str, cookie_name: &str) -> Option<String> {
    cookie_header
        .split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find(|(name, _)| name.trim() == cookie_name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
