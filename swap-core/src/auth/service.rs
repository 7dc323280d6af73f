use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use super::session::{AuthProvider, AuthUser, Session, SessionError};
use super::validation::validate_verification_code;
use crate::forms::{GENERAL_FIELD, ValidationErrors};

pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password. Please try again.";
pub const INVALID_RESET_LINK: &str = "Invalid or expired password reset link.";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("an account with this email already exists")]
    EmailTaken,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("invalid or expired password reset token")]
    InvalidResetToken,

    #[error("invalid verification code")]
    InvalidVerificationCode,

    #[error("OAuth sign-in failed: {0}")]
    OAuth(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("auth service unavailable: {0}")]
    Unavailable(String),
}

impl AuthError {
    /// The field error a form shows for this failure.
    pub fn to_form_errors(&self) -> ValidationErrors {
        match self {
            Self::EmailTaken => ValidationErrors::single("email", "An account with this email already exists"),
            Self::InvalidCredentials => ValidationErrors::general(INVALID_CREDENTIALS),
            Self::InvalidResetToken => ValidationErrors::general(INVALID_RESET_LINK),
            Self::InvalidVerificationCode => ValidationErrors::single("email_code", "Invalid verification code"),
            Self::OAuth(_) => ValidationErrors::general("Authentication failed. Please try again."),
            Self::Session(_) | Self::Unavailable(_) => ValidationErrors::single(GENERAL_FIELD, GENERIC_FAILURE),
        }
    }
}

/// Account operations behind the auth forms.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<AuthUser, AuthError>;

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError>;

    /// Exchanges an OAuth callback code for a session.
    async fn sign_in_with_provider(
        &self,
        provider: AuthProvider,
        code: &str,
    ) -> Result<Session, AuthError>;

    async fn refresh_session(
        &self,
        session: &mut Session,
    ) -> Result<(), AuthError>;

    async fn sign_out(
        &self,
        session: &mut Session,
    ) -> Result<(), AuthError>;

    /// Starts a password reset. Returns the token a reset link would carry.
    async fn send_password_reset(
        &self,
        email: &str,
    ) -> Result<String, AuthError>;

    async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;

    async fn send_verification_email(
        &self,
        email: &str,
    ) -> Result<(), AuthError>;

    async fn verify_email(
        &self,
        email: &str,
        code: &str,
    ) -> Result<(), AuthError>;

    /// Records that the user finished onboarding.
    async fn complete_onboarding(
        &self,
        user_id: &str,
    ) -> Result<(), AuthError>;
}

struct Account {
    user: AuthUser,
    password: String,
}

#[derive(Default)]
struct Accounts {
    by_email: HashMap<String, Account>,
    reset_tokens: HashMap<String, String>,
    sessions: HashMap<String, String>,
}

impl Accounts {
    fn by_id_mut(
        &mut self,
        user_id: &str,
    ) -> Option<&mut Account> {
        self.by_email.values_mut().find(|a| a.user.id == user_id)
    }
}

/// In-process auth service that waits a fixed delay on every call.
///
/// Accounts and passwords are kept in memory as given. Any six-digit code
/// verifies an email. With [`SimulatedAuthService::failing`] every call
/// fails as if the network were down.
pub struct SimulatedAuthService {
    delay: Duration,
    session_ttl: chrono::TimeDelta,
    failing: bool,
    accounts: Mutex<Accounts>,
}

impl SimulatedAuthService {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            session_ttl: Session::DEFAULT_TTL,
            failing: false,
            accounts: Mutex::new(Accounts::default()),
        }
    }

    /// A service whose every call fails.
    pub fn failing(delay: Duration) -> Self {
        Self {
            failing: true,
            ..Self::new(delay)
        }
    }

    async fn round_trip(&self) -> Result<(), AuthError> {
        tokio::time::sleep(self.delay).await;
        if self.failing {
            warn!("simulated auth call failed");
            return Err(AuthError::Unavailable("simulated network failure".to_string()));
        }
        Ok(())
    }

    fn key(email: &str) -> String {
        email.trim().to_lowercase()
    }

    fn issue(
        &self,
        accounts: &mut Accounts,
        user: AuthUser,
    ) -> Session {
        let session = Session::issue(user, Utc::now(), self.session_ttl);
        accounts
            .sessions
            .insert(session.refresh_token().to_string(), session.user.id.clone());
        session
    }
}

impl Default for SimulatedAuthService {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

#[async_trait]
impl AuthService for SimulatedAuthService {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<AuthUser, AuthError> {
        self.round_trip().await?;
        let mut accounts = self.accounts.lock().await;
        let key = Self::key(email);
        if accounts.by_email.contains_key(&key) {
            return Err(AuthError::EmailTaken);
        }
        let user = AuthUser {
            id: Uuid::new_v4().to_string(),
            email: key.clone(),
            full_name: full_name.map(str::trim).filter(|n| !n.is_empty()).map(String::from),
            provider: AuthProvider::Email,
            email_verified: false,
            onboarding_completed: false,
        };
        accounts.by_email.insert(
            key,
            Account {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        info!(user_id = %user.id, "account created");
        Ok(user)
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        self.round_trip().await?;
        let mut accounts = self.accounts.lock().await;
        let user = match accounts.by_email.get(&Self::key(email)) {
            Some(account) if account.password == password => account.user.clone(),
            _ => return Err(AuthError::InvalidCredentials),
        };
        info!(user_id = %user.id, "signed in");
        Ok(self.issue(&mut accounts, user))
    }

    async fn sign_in_with_provider(
        &self,
        provider: AuthProvider,
        code: &str,
    ) -> Result<Session, AuthError> {
        self.round_trip().await?;
        if !provider.is_oauth() {
            return Err(AuthError::OAuth(format!("{} is not an OAuth provider", provider.as_str())));
        }
        if code.is_empty() {
            return Err(AuthError::OAuth("no code provided".to_string()));
        }
        let mut accounts = self.accounts.lock().await;
        // The simulated provider identifies the user by the callback code.
        let email = format!("{}@{}.oauth", Self::key(code), provider.as_str());
        let user = accounts
            .by_email
            .entry(email.clone())
            .or_insert_with(|| Account {
                user: AuthUser {
                    id: Uuid::new_v4().to_string(),
                    email,
                    full_name: None,
                    provider,
                    email_verified: true,
                    onboarding_completed: false,
                },
                password: String::new(),
            })
            .user
            .clone();
        Ok(self.issue(&mut accounts, user))
    }

    async fn refresh_session(
        &self,
        session: &mut Session,
    ) -> Result<(), AuthError> {
        self.round_trip().await?;
        let mut accounts = self.accounts.lock().await;
        let old = session.refresh_token().to_string();
        if accounts.sessions.get(&old) != Some(&session.user.id) {
            return Err(SessionError::Revoked.into());
        }
        session.refresh(&old, Utc::now(), self.session_ttl)?;
        accounts.sessions.remove(&old);
        accounts
            .sessions
            .insert(session.refresh_token().to_string(), session.user.id.clone());
        Ok(())
    }

    async fn sign_out(
        &self,
        session: &mut Session,
    ) -> Result<(), AuthError> {
        self.round_trip().await?;
        let mut accounts = self.accounts.lock().await;
        accounts.sessions.remove(session.refresh_token());
        session.revoke();
        info!(user_id = %session.user.id, "signed out");
        Ok(())
    }

    async fn send_password_reset(
        &self,
        email: &str,
    ) -> Result<String, AuthError> {
        self.round_trip().await?;
        let mut accounts = self.accounts.lock().await;
        let token = Uuid::new_v4().simple().to_string();
        // Unknown addresses still get a token; it resets nothing.
        accounts.reset_tokens.insert(token.clone(), Self::key(email));
        Ok(token)
    }

    async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        self.round_trip().await?;
        let mut accounts = self.accounts.lock().await;
        let email = accounts
            .reset_tokens
            .remove(token)
            .ok_or(AuthError::InvalidResetToken)?;
        let account = accounts
            .by_email
            .get_mut(&email)
            .ok_or(AuthError::InvalidResetToken)?;
        account.password = new_password.to_string();
        info!(user_id = %account.user.id, "password reset");
        Ok(())
    }

    async fn send_verification_email(
        &self,
        email: &str,
    ) -> Result<(), AuthError> {
        self.round_trip().await?;
        info!(email, "verification email sent");
        Ok(())
    }

    async fn verify_email(
        &self,
        email: &str,
        code: &str,
    ) -> Result<(), AuthError> {
        self.round_trip().await?;
        if validate_verification_code(code).is_some() {
            return Err(AuthError::InvalidVerificationCode);
        }
        let mut accounts = self.accounts.lock().await;
        if let Some(account) = accounts.by_email.get_mut(&Self::key(email)) {
            account.user.email_verified = true;
        }
        Ok(())
    }

    async fn complete_onboarding(
        &self,
        user_id: &str,
    ) -> Result<(), AuthError> {
        self.round_trip().await?;
        let mut accounts = self.accounts.lock().await;
        if let Some(account) = accounts.by_id_mut(user_id) {
            account.user.onboarding_completed = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn service() -> SimulatedAuthService {
        SimulatedAuthService::new(Duration::ZERO)
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let auth = service();
        auth.sign_up("alex@email.com", "Str0ng!Pass", None).await.unwrap();

        let err = auth.sign_up("Alex@Email.com", "Str0ng!Pass", None).await.unwrap_err();

        assert_eq!(err, AuthError::EmailTaken);
        assert_eq!(
            err.to_form_errors().get("email"),
            Some("An account with this email already exists")
        );
    }

    #[tokio::test]
    async fn sign_in_checks_password() {
        let auth = service();
        auth.sign_up("alex@email.com", "Str0ng!Pass", Some("Alex Johnson")).await.unwrap();

        let session = auth.sign_in("alex@email.com", "Str0ng!Pass").await.unwrap();
        assert_eq!(session.user.full_name.as_deref(), Some("Alex Johnson"));

        let err = auth.sign_in("alex@email.com", "wrong").await.unwrap_err();
        assert_eq!(err.to_form_errors().get(GENERAL_FIELD), Some(INVALID_CREDENTIALS));
    }

    #[tokio::test]
    async fn refresh_then_sign_out() {
        let auth = service();
        auth.sign_up("alex@email.com", "Str0ng!Pass", None).await.unwrap();
        let mut session = auth.sign_in("alex@email.com", "Str0ng!Pass").await.unwrap();
        let first = session.access_token().to_string();

        auth.refresh_session(&mut session).await.unwrap();
        assert_ne!(session.access_token(), first);

        let mut stale = session.clone();
        auth.sign_out(&mut session).await.unwrap();
        assert!(session.is_revoked());
        assert_eq!(
            auth.refresh_session(&mut stale).await,
            Err(AuthError::Session(SessionError::Revoked))
        );
    }

    #[tokio::test]
    async fn reset_token_is_single_use() {
        let auth = service();
        auth.sign_up("alex@email.com", "Str0ng!Pass", None).await.unwrap();
        let token = auth.send_password_reset("alex@email.com").await.unwrap();

        auth.reset_password(&token, "N3wPassword").await.unwrap();
        assert!(auth.sign_in("alex@email.com", "N3wPassword").await.is_ok());
        assert_eq!(
            auth.reset_password(&token, "Another1A").await,
            Err(AuthError::InvalidResetToken)
        );
    }

    #[tokio::test]
    async fn oauth_users_are_created_once() {
        let auth = service();

        let first = auth.sign_in_with_provider(AuthProvider::Google, "abc").await.unwrap();
        let second = auth.sign_in_with_provider(AuthProvider::Google, "abc").await.unwrap();

        assert_eq!(first.user.id, second.user.id);
        assert!(!first.user.onboarding_completed);

        auth.complete_onboarding(&first.user.id).await.unwrap();
        let third = auth.sign_in_with_provider(AuthProvider::Google, "abc").await.unwrap();
        assert!(third.user.onboarding_completed);
    }

    #[tokio::test]
    async fn failing_service_maps_to_general_error() {
        let auth = SimulatedAuthService::failing(Duration::ZERO);

        let err = auth.sign_in("alex@email.com", "x").await.unwrap_err();

        assert!(matches!(err, AuthError::Unavailable(_)));
        assert_eq!(err.to_form_errors().get(GENERAL_FIELD), Some(GENERIC_FAILURE));
    }
}
