use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// How a user authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Email,
    Google,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Google => "google",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "email" => Some(Self::Email),
            "google" => Some(Self::Google),
            _ => None,
        }
    }

    pub fn is_oauth(&self) -> bool {
        !matches!(self, Self::Email)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub provider: AuthProvider,
    pub email_verified: bool,
    pub onboarding_completed: bool,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session has been revoked")]
    Revoked,

    #[error("refresh token does not match the session")]
    TokenMismatch,

    #[error("session expired at {0}")]
    Expired(DateTime<Utc>),
}

/// An authenticated session.
///
/// Tokens are opaque random identifiers with no cryptographic meaning.
/// A session is created by [`Session::issue`], extended by
/// [`Session::refresh`] and ended by [`Session::revoke`]; nothing else
/// changes its tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: AuthUser,
    access_token: String,
    refresh_token: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    revoked: bool,
}

impl Session {
    pub const DEFAULT_TTL: TimeDelta = TimeDelta::hours(1);

    pub fn issue(
        user: AuthUser,
        now: DateTime<Utc>,
        ttl: TimeDelta,
    ) -> Self {
        tracing::debug!(user_id = %user.id, "issuing session");
        Self {
            user,
            access_token: Uuid::new_v4().to_string(),
            refresh_token: Uuid::new_v4().to_string(),
            issued_at: now,
            expires_at: now + ttl,
            revoked: false,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked
    }

    /// Not revoked and not yet expired at `now`.
    pub fn is_active(
        &self,
        now: DateTime<Utc>,
    ) -> bool {
        !self.revoked && now < self.expires_at
    }

    /// Checks the session is usable at `now`.
    pub fn ensure_active(
        &self,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if self.revoked {
            return Err(SessionError::Revoked);
        }
        if now >= self.expires_at {
            return Err(SessionError::Expired(self.expires_at));
        }
        Ok(())
    }

    /// Rotates both tokens and extends the expiry by `ttl` from `now`.
    ///
    /// An expired session may be refreshed; a revoked one may not.
    pub fn refresh(
        &mut self,
        refresh_token: &str,
        now: DateTime<Utc>,
        ttl: TimeDelta,
    ) -> Result<(), SessionError> {
        if self.revoked {
            return Err(SessionError::Revoked);
        }
        if refresh_token != self.refresh_token {
            return Err(SessionError::TokenMismatch);
        }
        self.access_token = Uuid::new_v4().to_string();
        self.refresh_token = Uuid::new_v4().to_string();
        self.issued_at = now;
        self.expires_at = now + ttl;
        tracing::debug!(user_id = %self.user.id, expires_at = %self.expires_at, "session refreshed");
        Ok(())
    }

    pub fn revoke(&mut self) {
        self.revoked = true;
        tracing::debug!(user_id = %self.user.id, "session revoked");
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn user() -> AuthUser {
        AuthUser {
            id: "u1".to_string(),
            email: "alex.johnson@email.com".to_string(),
            full_name: None,
            provider: AuthProvider::Email,
            email_verified: false,
            onboarding_completed: false,
        }
    }

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-09-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn issued_session_expires_after_ttl() {
        let session = Session::issue(user(), t0(), Session::DEFAULT_TTL);

        assert!(session.is_active(t0()));
        assert!(!session.is_active(t0() + TimeDelta::hours(1)));
        assert_eq!(
            session.ensure_active(t0() + TimeDelta::hours(2)),
            Err(SessionError::Expired(t0() + TimeDelta::hours(1)))
        );
    }

    #[test]
    fn refresh_rotates_tokens_and_extends_expiry() {
        let mut session = Session::issue(user(), t0(), Session::DEFAULT_TTL);
        let old_access = session.access_token().to_string();
        let old_refresh = session.refresh_token().to_string();
        let later = t0() + TimeDelta::minutes(90);

        session.refresh(&old_refresh, later, Session::DEFAULT_TTL).unwrap();

        assert_ne!(session.access_token(), old_access);
        assert_ne!(session.refresh_token(), old_refresh);
        assert_eq!(session.expires_at(), later + Session::DEFAULT_TTL);
        assert!(session.is_active(later));
    }

    #[test]
    fn refresh_rejects_stale_token() {
        let mut session = Session::issue(user(), t0(), Session::DEFAULT_TTL);

        assert_eq!(
            session.refresh("not-the-token", t0(), Session::DEFAULT_TTL),
            Err(SessionError::TokenMismatch)
        );
    }

    #[test]
    fn revoked_session_cannot_be_refreshed() {
        let mut session = Session::issue(user(), t0(), Session::DEFAULT_TTL);
        let token = session.refresh_token().to_string();
        session.revoke();

        assert!(!session.is_active(t0()));
        assert_eq!(session.refresh(&token, t0(), Session::DEFAULT_TTL), Err(SessionError::Revoked));
    }

    #[test]
    fn oauth_providers() {
        assert!(AuthProvider::Google.is_oauth());
        assert!(!AuthProvider::Email.is_oauth());
        assert_eq!(AuthProvider::parse("google"), Some(AuthProvider::Google));
    }
}
