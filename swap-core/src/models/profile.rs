use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub languages: Vec<String>,
    pub contact_method: Option<String>,
    pub onboarding_completed: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values written by a profile upsert. The user id is the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub languages: Vec<String>,
    pub contact_method: Option<String>,
    pub onboarding_completed: bool,
}

impl From<Profile> for ProfileInput {
    fn from(profile: Profile) -> Self {
        Self {
            user_id: profile.user_id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: profile.email,
            location: profile.location,
            phone: profile.phone,
            bio: profile.bio,
            languages: profile.languages,
            contact_method: profile.contact_method,
            onboarding_completed: profile.onboarding_completed,
        }
    }
}
