use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Profile;

pub const LOCATION_NOT_SET: &str = "Location not set";

/// A profile shaped for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileView {
    pub name: String,
    pub initials: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub location: String,
    pub bio: String,
    pub phone: String,
    pub languages: Vec<String>,
    pub member_since: DateTime<Utc>,
}

/// First and last name joined, else the local part of the email, else
/// `"User"`.
pub fn display_name(
    first_name: Option<&str>,
    last_name: Option<&str>,
    email: Option<&str>,
) -> String {
    let full = format!("{} {}", first_name.unwrap_or_default(), last_name.unwrap_or_default());
    let full = full.trim();
    if !full.is_empty() {
        return full.to_string();
    }
    email
        .and_then(|e| e.split('@').next())
        .filter(|local| !local.is_empty())
        .unwrap_or("User")
        .to_string()
}

/// Uppercased first letters of the first two words of `name`.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

impl ProfileView {
    /// `auth_email` stands in when the profile has no email of its own.
    pub fn from_profile(
        profile: &Profile,
        auth_email: Option<&str>,
    ) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let email = profile
            .email
            .as_deref()
            .filter(|e| !e.is_empty())
            .or(auth_email)
            .unwrap_or_default()
            .to_string();
        let name = display_name(
            profile.first_name.as_deref(),
            profile.last_name.as_deref(),
            auth_email.or(Some(email.as_str())),
        );

        Self {
            initials: initials(&name),
            name,
            first_name: text(&profile.first_name),
            last_name: text(&profile.last_name),
            email,
            location: profile
                .location
                .clone()
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| LOCATION_NOT_SET.to_string()),
            bio: text(&profile.bio),
            phone: text(&profile.phone),
            languages: profile.languages.clone(),
            member_since: profile.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn profile() -> Profile {
        Profile {
            user_id: "u1".to_string(),
            first_name: None,
            last_name: None,
            email: None,
            location: None,
            phone: None,
            bio: None,
            languages: vec![],
            contact_method: None,
            onboarding_completed: false,
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        }
    }

    #[test]
    fn display_name_fallbacks() {
        assert_eq!(display_name(Some("Alex"), Some("Johnson"), None), "Alex Johnson");
        assert_eq!(display_name(Some("Alex"), None, Some("a@b.com")), "Alex");
        assert_eq!(display_name(None, Some(" "), Some("alex.j@email.com")), "alex.j");
        assert_eq!(display_name(None, None, None), "User");
    }

    #[test]
    fn initials_take_two_words() {
        assert_eq!(initials("Alex Johnson"), "AJ");
        assert_eq!(initials("maria de la cruz"), "MD");
        assert_eq!(initials("alex.j"), "A");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn empty_profile_uses_defaults() {
        let view = ProfileView::from_profile(&profile(), Some("sam@email.com"));

        assert_eq!(view.name, "sam");
        assert_eq!(view.initials, "S");
        assert_eq!(view.email, "sam@email.com");
        assert_eq!(view.location, LOCATION_NOT_SET);
    }

    #[test]
    fn filled_profile() {
        let mut p = profile();
        p.first_name = Some("Alex".to_string());
        p.last_name = Some("Johnson".to_string());
        p.email = Some("alex.johnson@email.com".to_string());
        p.location = Some("Berlin, Germany".to_string());

        let view = ProfileView::from_profile(&p, None);

        assert_eq!(view.name, "Alex Johnson");
        assert_eq!(view.initials, "AJ");
        assert_eq!(view.location, "Berlin, Germany");
    }
}
