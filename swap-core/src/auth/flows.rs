//! Submission handlers tying the auth forms to an [`AuthService`].
//!
//! Each handler validates through the form's [`FormStore`], runs the service
//! call with the loading flag set, and on success returns where to go next.

use tracing::{info, warn};

use super::forms::{
    ForgotPasswordForm, ResetPasswordForm, SignInForm, SignUpForm, validate_forgot_password,
    validate_reset_password, validate_sign_in, validate_sign_up,
};
use super::routes::{Route, after_sign_in, after_sign_out, query_value};
use super::service::{AuthError, AuthService};
use super::session::{AuthProvider, AuthUser, Session};
use crate::forms::{FormStore, ValidationErrors};

/// Creates the account. Success leads to onboarding step 1.
pub async fn submit_sign_up(
    store: &mut FormStore<SignUpForm>,
    auth: &dyn AuthService,
) -> Option<(AuthUser, Route)> {
    store
        .submit(validate_sign_up, |form| {
            let form = form.clone();
            async move {
                let full_name = Some(form.full_name.as_str()).filter(|n| !n.trim().is_empty());
                auth.sign_up(&form.email, &form.password, full_name)
                    .await
                    .map_err(|e| e.to_form_errors())
            }
        })
        .await
        .completed()
        .map(|user| (user, Route::Onboarding(1)))
}

pub async fn submit_sign_in(
    store: &mut FormStore<SignInForm>,
    auth: &dyn AuthService,
) -> Option<(Session, Route)> {
    store
        .submit(validate_sign_in, |form| {
            let form = form.clone();
            async move {
                auth.sign_in(&form.email, &form.password)
                    .await
                    .map_err(|e| e.to_form_errors())
            }
        })
        .await
        .completed()
        .map(|session| {
            let route = after_sign_in(&session.user);
            (session, route)
        })
}

/// Sends the reset email. Returns the token the emailed link carries.
pub async fn submit_forgot_password(
    store: &mut FormStore<ForgotPasswordForm>,
    auth: &dyn AuthService,
) -> Option<String> {
    store
        .submit(validate_forgot_password, |form| {
            let email = form.email.clone();
            async move {
                auth.send_password_reset(&email).await.map_err(|e| {
                    warn!(error = %e, "password reset request failed");
                    ValidationErrors::general("Failed to send reset email. Please try again.")
                })
            }
        })
        .await
        .completed()
}

/// Sets the new password. Success leads back to sign-in.
pub async fn submit_reset_password(
    store: &mut FormStore<ResetPasswordForm>,
    auth: &dyn AuthService,
) -> Option<Route> {
    store
        .submit(validate_reset_password, |form| {
            let form = form.clone();
            async move {
                let token = form.token.unwrap_or_default();
                auth.reset_password(&token, &form.password)
                    .await
                    .map_err(|e| match e {
                        AuthError::InvalidResetToken => e.to_form_errors(),
                        _ => ValidationErrors::general("Failed to reset password. Please try again."),
                    })
            }
        })
        .await
        .completed()
        .map(|()| Route::SignIn)
}

/// Handles the OAuth callback URL.
///
/// A provider error or a missing code sends the user back to sign-in with an
/// `error` query value; otherwise the code is exchanged for a session.
pub async fn oauth_callback(
    url: &str,
    provider: AuthProvider,
    auth: &dyn AuthService,
) -> (Option<Session>, String) {
    if let Some(error) = query_value(url, "error") {
        warn!(error, "OAuth provider returned an error");
        return (None, format!("{}?error={error}", Route::SignIn));
    }
    let Some(code) = query_value(url, "code").filter(|c| !c.is_empty()) else {
        warn!("OAuth callback without code");
        return (None, format!("{}?error=no_code_provided", Route::SignIn));
    };
    match auth.sign_in_with_provider(provider, code).await {
        Ok(session) => {
            let route = after_sign_in(&session.user);
            info!(user_id = %session.user.id, %route, "OAuth sign-in");
            (Some(session), route.path())
        }
        Err(e) => {
            warn!(error = %e, "OAuth code exchange failed");
            (None, format!("{}?error=oauth_callback_error", Route::SignIn))
        }
    }
}

pub async fn sign_out(
    session: &mut Session,
    auth: &dyn AuthService,
) -> Result<Route, AuthError> {
    auth.sign_out(session).await?;
    Ok(after_sign_out())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::auth::service::{INVALID_CREDENTIALS, SimulatedAuthService};
    use crate::forms::GENERAL_FIELD;

    fn auth() -> SimulatedAuthService {
        SimulatedAuthService::new(Duration::ZERO)
    }

    #[tokio::test]
    async fn weak_password_then_strong_password_reaches_onboarding() {
        let auth = auth();
        let mut store = FormStore::new(SignUpForm::default());
        store.update("email", "alex.johnson@email.com").unwrap();
        store.update("password", "weak").unwrap();
        store.update("confirm_password", "weak").unwrap();
        store.update("accept_terms", true).unwrap();

        assert_eq!(submit_sign_up(&mut store, &auth).await, None);
        assert_eq!(store.error("password"), Some("Password must be at least 8 characters"));

        store.update("password", "Str0ng!Pass").unwrap();
        store.update("confirm_password", "Str0ng!Pass").unwrap();
        assert_eq!(store.error("password"), None);

        let (user, route) = submit_sign_up(&mut store, &auth).await.unwrap();
        assert_eq!(route.path(), "/auth/onboarding/step-1");
        assert_eq!(user.email, "alex.johnson@email.com");
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn failed_sign_in_sets_general_error() {
        let auth = auth();
        let mut store = FormStore::new(SignInForm {
            email: "nobody@email.com".to_string(),
            password: "whatever".to_string(),
            remember_me: false,
        });

        assert!(submit_sign_in(&mut store, &auth).await.is_none());
        assert_eq!(store.error(GENERAL_FIELD), Some(INVALID_CREDENTIALS));
    }

    #[tokio::test]
    async fn email_sign_in_goes_to_profile() {
        let auth = auth();
        auth.sign_up("alex@email.com", "Str0ng!Pass", None).await.unwrap();
        let mut store = FormStore::new(SignInForm {
            email: "alex@email.com".to_string(),
            password: "Str0ng!Pass".to_string(),
            remember_me: true,
        });

        let (_, route) = submit_sign_in(&mut store, &auth).await.unwrap();

        assert_eq!(route, Route::Profile);
    }

    #[tokio::test]
    async fn reset_flow_from_link() {
        let auth = auth();
        auth.sign_up("alex@email.com", "Str0ng!Pass", None).await.unwrap();
        let mut forgot = FormStore::new(ForgotPasswordForm {
            email: "alex@email.com".to_string(),
        });
        let token = submit_forgot_password(&mut forgot, &auth).await.unwrap();

        let link = format!("https://flatswaps.com/auth/reset-password?token={token}");
        let mut reset = FormStore::new(ResetPasswordForm::from_link(&link));
        reset.update("password", "N3wPassword").unwrap();
        reset.update("confirm_password", "N3wPassword").unwrap();

        assert_eq!(submit_reset_password(&mut reset, &auth).await, Some(Route::SignIn));
        assert!(auth.sign_in("alex@email.com", "N3wPassword").await.is_ok());
    }

    #[tokio::test]
    async fn oauth_callback_routes() {
        let auth = auth();

        let (session, to) = oauth_callback("/auth/callback?code=g-123", AuthProvider::Google, &auth).await;
        assert!(session.is_some());
        assert_eq!(to, "/auth/onboarding/step-1");

        let (session, to) = oauth_callback("/auth/callback?error=access_denied", AuthProvider::Google, &auth).await;
        assert!(session.is_none());
        assert_eq!(to, "/auth/signin?error=access_denied");

        let (_, to) = oauth_callback("/auth/callback", AuthProvider::Google, &auth).await;
        assert_eq!(to, "/auth/signin?error=no_code_provided");
    }

    #[tokio::test]
    async fn sign_out_goes_home() {
        let auth = auth();
        auth.sign_up("alex@email.com", "Str0ng!Pass", None).await.unwrap();
        let mut session = auth.sign_in("alex@email.com", "Str0ng!Pass").await.unwrap();

        assert_eq!(sign_out(&mut session, &auth).await, Ok(Route::Home));
        assert!(session.is_revoked());
    }
}
