use std::io::Write;

use anyhow::{Result, bail};
use swap_core::FormStore;
use swap_core::auth::AuthService;
use swap_core::auth::flows::submit_sign_up;
use swap_core::auth::forms::SignUpForm;

use crate::app::App;
use crate::cli::SignupArgs;
use crate::state::AppState;

impl From<SignupArgs> for SignUpForm {
    fn from(args: SignupArgs) -> Self {
        let confirm_password = args.confirm.unwrap_or_else(|| args.password.clone());
        Self {
            full_name: args.name,
            email: args.email,
            password: args.password,
            confirm_password,
            accept_terms: args.accept_terms,
        }
    }
}

/// Runs the sign-up form against `auth`. On success the new account becomes
/// the saved user.
pub async fn sign_up(
    auth: &dyn AuthService,
    state: &mut AppState,
    form: SignUpForm,
    out: &mut dyn Write,
) -> Result<()> {
    let mut store = FormStore::new(form);
    let Some((user, route)) = submit_sign_up(&mut store, auth).await else {
        for (field, message) in store.errors().iter() {
            writeln!(out, "  {field}: {message}")?;
        }
        bail!("Sign-up failed");
    };

    writeln!(out, "Account created for {}", user.email)?;
    writeln!(out, "Next: {route}")?;
    state.user_id = user.id;
    state.email = Some(user.email);
    Ok(())
}

pub async fn run(
    app: &App,
    state: &mut AppState,
    args: SignupArgs,
    out: &mut dyn Write,
) -> Result<()> {
    sign_up(&app.auth, state, args.into(), out).await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use swap_core::auth::SimulatedAuthService;

    use super::*;

    fn form() -> SignUpForm {
        SignUpForm {
            full_name: "Alex Johnson".to_string(),
            email: "alex@example.com".to_string(),
            password: "Str0ngPass!".to_string(),
            confirm_password: "Str0ngPass!".to_string(),
            accept_terms: true,
        }
    }

    #[tokio::test]
    async fn success_saves_user_and_points_to_onboarding() {
        let auth = SimulatedAuthService::new(Duration::ZERO);
        let mut state = AppState::default();
        let mut out = Vec::new();

        sign_up(&auth, &mut state, form(), &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Next: /auth/onboarding/step-1"));
        assert_eq!(state.email.as_deref(), Some("alex@example.com"));
        assert_ne!(state.user_id, "currentUser");
    }

    #[tokio::test]
    async fn mismatched_passwords_are_listed() {
        let auth = SimulatedAuthService::new(Duration::ZERO);
        let mut state = AppState::default();
        let mut out = Vec::new();
        let form = SignUpForm {
            confirm_password: "different".to_string(),
            ..form()
        };

        assert!(sign_up(&auth, &mut state, form, &mut out).await.is_err());

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("confirm_password: Passwords do not match"));
        assert_eq!(state, AppState::default());
    }

    #[tokio::test]
    async fn service_failure_keeps_state() {
        let auth = SimulatedAuthService::failing(Duration::ZERO);
        let mut state = AppState::default();

        assert!(sign_up(&auth, &mut state, form(), &mut Vec::new()).await.is_err());
        assert_eq!(state, AppState::default());
    }

    #[test]
    fn confirm_defaults_to_password() {
        let form: SignUpForm = SignupArgs {
            name: String::new(),
            email: "a@b.co".to_string(),
            password: "secret123".to_string(),
            confirm: None,
            accept_terms: true,
        }
        .into();

        assert_eq!(form.confirm_password, "secret123");
    }
}
