use crate::forms::{FieldPath, FieldValue, FormError, FormFields, GENERAL_FIELD, ValidationErrors};

use super::service::INVALID_RESET_LINK;
use super::validation::{validate_email, validate_full_name, validate_password};

pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    /// Optional; validated only when filled in.
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
}

impl FormFields for SignUpForm {
    fn set_field(
        &mut self,
        path: &FieldPath<'_>,
        value: FieldValue,
    ) -> Result<(), FormError> {
        match path.as_str() {
            "full_name" => self.full_name = value.into_text(path)?,
            "email" => self.email = value.into_text(path)?,
            "password" => self.password = value.into_text(path)?,
            "confirm_password" => self.confirm_password = value.into_text(path)?,
            "accept_terms" => self.accept_terms = value.into_flag(path)?,
            _ => return Err(path.unknown()),
        }
        Ok(())
    }
}

pub fn validate_sign_up(form: &SignUpForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if !form.full_name.trim().is_empty() {
        errors.insert_opt("full_name", validate_full_name(&form.full_name));
    }
    errors.insert_opt("email", validate_email(&form.email));
    errors.insert_opt("password", validate_password(&form.password));
    if form.password != form.confirm_password {
        errors.insert("confirm_password", PASSWORDS_DO_NOT_MATCH);
    }
    if !form.accept_terms {
        errors.insert("accept_terms", "You must accept the terms and conditions");
    }
    errors
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

impl FormFields for SignInForm {
    fn set_field(
        &mut self,
        path: &FieldPath<'_>,
        value: FieldValue,
    ) -> Result<(), FormError> {
        match path.as_str() {
            "email" => self.email = value.into_text(path)?,
            "password" => self.password = value.into_text(path)?,
            "remember_me" => self.remember_me = value.into_flag(path)?,
            _ => return Err(path.unknown()),
        }
        Ok(())
    }
}

/// Sign-in only checks the password is present; policy applies at sign-up.
pub fn validate_sign_in(form: &SignInForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.insert_opt("email", validate_email(&form.email));
    if form.password.is_empty() {
        errors.insert("password", "Password is required");
    }
    errors
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl FormFields for ForgotPasswordForm {
    fn set_field(
        &mut self,
        path: &FieldPath<'_>,
        value: FieldValue,
    ) -> Result<(), FormError> {
        match path.as_str() {
            "email" => self.email = value.into_text(path)?,
            _ => return Err(path.unknown()),
        }
        Ok(())
    }
}

pub fn validate_forgot_password(form: &ForgotPasswordForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.insert_opt("email", validate_email(&form.email));
    errors
}

/// New-password form reached from a reset link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetPasswordForm {
    /// Token from the link's query string, if it had one.
    pub token: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

impl ResetPasswordForm {
    /// A form for the reset link `url`, reading its `token` query value.
    pub fn from_link(url: &str) -> Self {
        Self {
            token: super::routes::query_value(url, "token")
                .filter(|t| !t.is_empty())
                .map(String::from),
            ..Self::default()
        }
    }
}

impl FormFields for ResetPasswordForm {
    fn set_field(
        &mut self,
        path: &FieldPath<'_>,
        value: FieldValue,
    ) -> Result<(), FormError> {
        match path.as_str() {
            "password" => self.password = value.into_text(path)?,
            "confirm_password" => self.confirm_password = value.into_text(path)?,
            _ => return Err(path.unknown()),
        }
        Ok(())
    }
}

/// A missing token fails the whole form before the password is looked at.
pub fn validate_reset_password(form: &ResetPasswordForm) -> ValidationErrors {
    if form.token.as_deref().is_none_or(str::is_empty) {
        return ValidationErrors::single(GENERAL_FIELD, INVALID_RESET_LINK);
    }
    let mut errors = ValidationErrors::new();
    errors.insert_opt("password", validate_password(&form.password));
    if errors.is_empty() && form.password != form.confirm_password {
        errors.insert("confirm_password", PASSWORDS_DO_NOT_MATCH);
    }
    errors
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::forms::FormStore;

    #[test]
    fn sign_up_skips_empty_full_name() {
        let form = SignUpForm {
            email: "alex@email.com".to_string(),
            password: "Str0ng!Pass".to_string(),
            confirm_password: "Str0ng!Pass".to_string(),
            accept_terms: true,
            ..SignUpForm::default()
        };
        assert!(validate_sign_up(&form).is_empty());

        let named = SignUpForm {
            full_name: "Alex".to_string(),
            ..form
        };
        assert_eq!(
            validate_sign_up(&named).get("full_name"),
            Some("Please enter your full name (first and last name)")
        );
    }

    #[test]
    fn sign_up_reports_every_field() {
        let errors = validate_sign_up(&SignUpForm {
            password: "weak".to_string(),
            ..SignUpForm::default()
        });

        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password must be at least 8 characters"));
        assert_eq!(errors.get("confirm_password"), Some(PASSWORDS_DO_NOT_MATCH));
        assert_eq!(errors.get("accept_terms"), Some("You must accept the terms and conditions"));
    }

    #[test]
    fn sign_in_requires_only_presence() {
        let mut store = FormStore::new(SignInForm::default());
        store.update("email", "alex@email.com").unwrap();
        store.update("password", "x").unwrap();
        store.update("remember_me", true).unwrap();

        assert!(store.validate_with(validate_sign_in));
        assert!(store.data().remember_me);
    }

    #[test]
    fn reset_without_token_is_invalid_link() {
        let form = ResetPasswordForm::from_link("https://flatswaps.com/auth/reset-password");

        assert_eq!(validate_reset_password(&form).get(GENERAL_FIELD), Some(INVALID_RESET_LINK));
    }

    #[test]
    fn reset_checks_policy_before_confirmation() {
        let mut form = ResetPasswordForm::from_link("/auth/reset-password?token=abc");
        assert_eq!(form.token.as_deref(), Some("abc"));

        form.password = "short".to_string();
        form.confirm_password = "different".to_string();
        let errors = validate_reset_password(&form);
        assert_eq!(errors.get("password"), Some("Password must be at least 8 characters"));
        assert_eq!(errors.get("confirm_password"), None);

        form.password = "Str0ng!Pass".to_string();
        assert_eq!(validate_reset_password(&form).get("confirm_password"), Some(PASSWORDS_DO_NOT_MATCH));
    }

    #[test]
    fn token_is_not_a_settable_field() {
        let mut store = FormStore::new(ResetPasswordForm::default());

        assert_eq!(store.update("token", "forged"), Err(FormError::UnknownField("token".to_string())));
    }
}
