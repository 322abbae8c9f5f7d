//! Identity provider seam
//!
//! Sign-in is delegated to an external provider that emails magic links and
//! later trades the one-time code from the link for a verified identity.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use pd_core::clock::Clock;
use pd_models::Role;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::session::generate_token;

/// Verified user returned by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Unknown user: {0}")]
    UnknownUser(String),
    #[error("Invalid code")]
    InvalidCode,
    #[error("Code expired")]
    ExpiredCode,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Email a sign-in link that lands on `redirect_to`
    async fn send_magic_link(&self, email: &str, redirect_to: &str) -> Result<(), IdentityError>;

    /// Trade the one-time code from a magic link for the user's identity
    async fn exchange_code(&self, code: &str) -> Result<Identity, IdentityError>;
}

/// Development provider: known users live in memory and magic links are
/// written to the log instead of being emailed.
///
/// Codes expire after the configured lifetime. Expired codes are swept
/// whenever a new one is issued, and only the most recent links are kept for
/// inspection.
pub struct MemoryIdentityProvider {
    users: Mutex<HashMap<String, Identity>>,
    pending: Mutex<HashMap<String, PendingCode>>,
    sent: Mutex<VecDeque<(String, String)>>,
    clock: Arc<dyn Clock>,
    code_lifetime: Duration,
}

struct PendingCode {
    email: String,
    expires_at: DateTime<Utc>,
}

const DEFAULT_CODE_LIFETIME_SECONDS: i64 = 15 * 60;
const SENT_LINK_HISTORY: usize = 32;

impl MemoryIdentityProvider {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            pending: Mutex::new(HashMap::new()),
            sent: Mutex::new(VecDeque::new()),
            clock,
            code_lifetime: Duration::seconds(DEFAULT_CODE_LIFETIME_SECONDS),
        }
    }

    pub fn with_code_lifetime(mut self, seconds: i64) -> Self {
        self.code_lifetime = Duration::seconds(seconds);
        self
    }

    /// Register a user that may sign in
    pub fn add_user(&self, email: impl Into<String>, role: Role) -> Identity {
        let email = email.into().to_lowercase();
        let identity = Identity {
            user_id: Uuid::new_v4(),
            email: email.clone(),
            role,
        };
        self.users.lock().insert(email, identity.clone());
        identity
    }

    /// Most recent magic links as `(email, url)` pairs, oldest first
    pub fn sent_links(&self) -> Vec<(String, String)> {
        self.sent.lock().iter().cloned().collect()
    }

    #[cfg(test)]
    fn pending_codes(&self) -> usize {
        self.pending.lock().len()
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn send_magic_link(&self, email: &str, redirect_to: &str) -> Result<(), IdentityError> {
        let email = email.trim().to_lowercase();
        if !self.users.lock().contains_key(&email) {
            return Err(IdentityError::UnknownUser(email));
        }

        let code = generate_token(32);
        let separator = if redirect_to.contains('?') { '&' } else { '?' };
        let link = format!("{}{}code={}", redirect_to, separator, code);

        let now = self.clock.now();
        {
            let mut pending = self.pending.lock();
            pending.retain(|_, p| p.expires_at > now);
            pending.insert(
                code,
                PendingCode {
                    email: email.clone(),
                    expires_at: now + self.code_lifetime,
                },
            );
        }
        tracing::info!(%email, %link, "Magic link issued");

        let mut sent = self.sent.lock();
        sent.push_back((email, link));
        while sent.len() > SENT_LINK_HISTORY {
            sent.pop_front();
        }
        Ok(())
    }

    async fn exchange_code(&self, code: &str) -> Result<Identity, IdentityError> {
        let pending = self
            .pending
            .lock()
            .remove(code)
            .ok_or(IdentityError::InvalidCode)?;

        if pending.expires_at <= self.clock.now() {
            return Err(IdentityError::ExpiredCode);
        }

        self.users
            .lock()
            .get(&pending.email)
            .cloned()
            .ok_or(IdentityError::UnknownUser(pending.email))
    }
}
