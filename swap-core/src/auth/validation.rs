//! Field validators shared by the auth, onboarding and listing forms.
//!
//! Each single-field validator returns the message of the first rule the
//! value breaks, or `None` when it is valid.

use std::sync::LazyLock;

use regex::Regex;

use crate::forms::{Rule, ValidationErrors, first_failure};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-ZÀ-ÿ\s'-]+$").expect("name pattern compiles"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").expect("phone pattern compiles"));

pub const BIO_MAX_CHARS: usize = 500;
pub const MIN_PASSWORD_LEN: usize = 8;

fn has_lowercase(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_lowercase())
}

fn has_uppercase(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_uppercase())
}

fn has_digit(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}

const EMAIL_RULES: &[Rule<str>] = &[
    Rule::new(|s| !s.is_empty(), "Email is required"),
    Rule::new(|s| EMAIL_RE.is_match(s), "Please enter a valid email address"),
];

const PASSWORD_RULES: &[Rule<str>] = &[
    Rule::new(|s| !s.is_empty(), "Password is required"),
    Rule::new(|s| s.chars().count() >= MIN_PASSWORD_LEN, "Password must be at least 8 characters"),
    Rule::new(has_lowercase, "Password must contain at least one lowercase letter"),
    Rule::new(has_uppercase, "Password must contain at least one uppercase letter"),
    Rule::new(has_digit, "Password must contain at least one number"),
];

const FULL_NAME_RULES: &[Rule<str>] = &[
    Rule::new(|s| !s.trim().is_empty(), "Full name is required"),
    Rule::new(|s| s.trim().chars().count() >= 2, "Name must be at least 2 characters"),
    Rule::new(|s| NAME_RE.is_match(s), "Name contains invalid characters"),
    Rule::new(
        |s| s.split_whitespace().count() >= 2,
        "Please enter your full name (first and last name)",
    ),
];

const VERIFICATION_CODE_RULES: &[Rule<str>] = &[
    Rule::new(|s| !s.is_empty(), "Verification code is required"),
    Rule::new(
        |s| s.len() == 6 && s.chars().all(|c| c.is_ascii_digit()),
        "Verification code must be 6 digits",
    ),
];

pub fn validate_email(email: &str) -> Option<&'static str> {
    first_failure(email, EMAIL_RULES)
}

/// Required, at least 8 characters, then one lowercase letter, one
/// uppercase letter and one digit, checked in that order.
pub fn validate_password(password: &str) -> Option<&'static str> {
    first_failure(password, PASSWORD_RULES)
}

pub fn validate_full_name(name: &str) -> Option<&'static str> {
    first_failure(name, FULL_NAME_RULES)
}

/// Optional. Spaces, dashes and parentheses are ignored.
pub fn validate_phone_number(phone: &str) -> Option<&'static str> {
    if phone.is_empty() {
        return None;
    }
    let digits: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();
    (!PHONE_RE.is_match(&digits)).then_some("Please enter a valid phone number")
}

pub fn validate_bio(bio: &str) -> Option<&'static str> {
    (bio.chars().count() > BIO_MAX_CHARS).then_some("Bio must be less than 500 characters")
}

/// City and country are both required; reports each missing one.
pub fn validate_location(
    city: &str,
    country: &str,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if city.trim().is_empty() {
        errors.insert("city", "City is required");
    }
    if country.trim().is_empty() {
        errors.insert("country", "Country is required");
    }
    errors
}

pub fn validate_verification_code(code: &str) -> Option<&'static str> {
    first_failure(code, VERIFICATION_CODE_RULES)
}

/// Password strength meter shown while typing a new password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    /// Number of satisfied criteria, `0..=4`.
    pub score: u8,
    pub feedback: &'static str,
}

pub fn password_strength(password: &str) -> PasswordStrength {
    let score = [
        password.chars().count() >= MIN_PASSWORD_LEN,
        has_lowercase(password),
        has_uppercase(password),
        has_digit(password),
    ]
    .into_iter()
    .filter(|&met| met)
    .count() as u8;

    let feedback = match score {
        0 | 1 => "Very weak",
        2 => "Weak",
        3 => "Fair",
        _ => "Strong",
    };
    PasswordStrength { score, feedback }
}
