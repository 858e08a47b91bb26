//! Admin session state.
//!
//! # Responsibility
//! - Hold the "admin is signed in" flag together with its expiry.
//! - Check sign-in attempts against configured demo credentials.
//!
//! # Invariants
//! - A session is authenticated only while `now < expires_at`.
//! - The session is an explicit value owned by the caller; nothing here is
//!   global, and the catalog store never consults it.
//! - This is a gate for editing tooling, not an authentication system: there
//!   are no tokens and no server-side validation.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Default session lifetime: 8 hours.
pub const DEFAULT_SESSION_TTL_MS: i64 = 8 * 60 * 60 * 1000;

/// Configured admin login pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Both fields compare exactly; surrounding whitespace is not ignored.
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self::new("admin@example.com", "password")
    }
}

// Keep the password out of logs and panic messages.
impl Debug for AdminCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    InvalidCredentials,
    /// Requested lifetime is zero or negative.
    InvalidTtl(i64),
    NotAuthenticated,
    /// Session was signed in but `expires_at` has passed.
    Expired { expired_at: i64 },
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid email or password"),
            Self::InvalidTtl(ttl) => write!(f, "session ttl must be positive, got {ttl}ms"),
            Self::NotAuthenticated => write!(f, "admin session is not authenticated"),
            Self::Expired { expired_at } => write!(f, "admin session expired at {expired_at}"),
        }
    }
}

impl Error for SessionError {}

/// Admin sign-in state passed explicitly to admin-only callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminSession {
    authenticated: bool,
    expires_at: Option<i64>,
}

impl AdminSession {
    /// Creates a signed-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signs in when `email`/`password` match `credentials`.
    ///
    /// A failed attempt leaves the current state untouched.
    pub fn sign_in(
        &mut self,
        credentials: &AdminCredentials,
        email: &str,
        password: &str,
        now_ms: i64,
        ttl_ms: i64,
    ) -> Result<(), SessionError> {
        if ttl_ms <= 0 {
            return Err(SessionError::InvalidTtl(ttl_ms));
        }
        if !credentials.matches(email, password) {
            return Err(SessionError::InvalidCredentials);
        }
        self.authenticated = true;
        self.expires_at = Some(now_ms.saturating_add(ttl_ms));
        Ok(())
    }

    pub fn sign_out(&mut self) {
        self.authenticated = false;
        self.expires_at = None;
    }

    pub fn is_authenticated(&self, now_ms: i64) -> bool {
        self.require_authenticated(now_ms).is_ok()
    }

    pub fn expires_at(&self) -> Option<i64> {
        self.expires_at
    }

    /// Guard for admin-only operations.
    pub fn require_authenticated(&self, now_ms: i64) -> Result<(), SessionError> {
        match (self.authenticated, self.expires_at) {
            (true, Some(expires_at)) if now_ms < expires_at => Ok(()),
            (true, Some(expires_at)) => Err(SessionError::Expired {
                expired_at: expires_at,
            }),
            _ => Err(SessionError::NotAuthenticated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AdminCredentials;

    #[test]
    fn debug_output_redacts_password() {
        let rendered = format!("{:?}", AdminCredentials::new("a@b.c", "hunter2"));
        assert!(rendered.contains("a@b.c"));
        assert!(!rendered.contains("hunter2"));
    }
}
