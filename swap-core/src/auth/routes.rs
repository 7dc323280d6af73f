//! Navigation targets returned by successful form submissions.

use std::fmt;

use super::session::AuthUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    SignIn,
    SignUp,
    ForgotPassword,
    ResetPassword,
    VerifyEmail,
    /// Onboarding step, `1..=3`.
    Onboarding(u8),
    Profile,
    Properties,
    Searches,
    Matches,
    Messages,
    Contracts,
    Checklist,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::SignIn => "/auth/signin".to_string(),
            Self::SignUp => "/auth/signup".to_string(),
            Self::ForgotPassword => "/auth/forgot-password".to_string(),
            Self::ResetPassword => "/auth/reset-password".to_string(),
            Self::VerifyEmail => "/auth/verify-email".to_string(),
            Self::Onboarding(step) => format!("/auth/onboarding/step-{step}"),
            Self::Profile => "/profile".to_string(),
            Self::Properties => "/profile/properties".to_string(),
            Self::Searches => "/profile/searches".to_string(),
            Self::Matches => "/profile/matches".to_string(),
            Self::Messages => "/profile/messages".to_string(),
            Self::Contracts => "/profile/contracts".to_string(),
            Self::Checklist => "/profile/checklist".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Where a user lands after signing in.
///
/// OAuth users who have not finished onboarding start it; everyone else
/// goes to their profile.
pub fn after_sign_in(user: &AuthUser) -> Route {
    if user.provider.is_oauth() && !user.onboarding_completed {
        Route::Onboarding(1)
    } else {
        Route::Profile
    }
}

pub fn after_sign_out() -> Route {
    Route::Home
}

/// Value of `key` in the query part of `url`, taken as a plain string.
///
/// Accepts a full URL, a path with a query, or a bare query string.
pub fn query_value<'a>(
    url: &'a str,
    key: &str,
) -> Option<&'a str> {
    let query = url.split_once('?').map_or(url, |(_, q)| q);
    let query = query.split_once('#').map_or(query, |(q, _)| q);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}
