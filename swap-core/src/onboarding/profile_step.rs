use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::auth::Route;
use crate::auth::service::GENERIC_FAILURE;
use crate::auth::validation::validate_bio;
use crate::db::{RepositoryError, SwapRepository};
use crate::forms::{FieldPath, FieldValue, FormError, FormFields, FormStore, ValidationErrors};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    Email,
    Phone,
    #[default]
    Both,
}

impl ContactMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Both => "both",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "email" => Some(Self::Email),
            "phone" => Some(Self::Phone),
            "both" => Some(Self::Both),
            _ => None,
        }
    }
}

impl fmt::Display for ContactMethod {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct City {
    pub name: &'static str,
    pub country: &'static str,
}

const fn city(
    name: &'static str,
    country: &'static str,
) -> City {
    City { name, country }
}

pub const POPULAR_CITIES: &[City] = &[
    city("Berlin", "Germany"),
    city("London", "United Kingdom"),
    city("Paris", "France"),
    city("Madrid", "Spain"),
    city("Amsterdam", "Netherlands"),
    city("Rome", "Italy"),
    city("Barcelona", "Spain"),
    city("Vienna", "Austria"),
    city("Prague", "Czech Republic"),
    city("Copenhagen", "Denmark"),
    city("Stockholm", "Sweden"),
    city("Helsinki", "Finland"),
    city("Oslo", "Norway"),
    city("Zurich", "Switzerland"),
    city("Brussels", "Belgium"),
    city("Dublin", "Ireland"),
    city("Lisbon", "Portugal"),
    city("Warsaw", "Poland"),
    city("Budapest", "Hungary"),
    city("Munich", "Germany"),
    city("Hamburg", "Germany"),
    city("Milan", "Italy"),
    city("Lyon", "France"),
    city("Manchester", "United Kingdom"),
    city("Edinburgh", "United Kingdom"),
    city("New York", "United States"),
    city("Los Angeles", "United States"),
    city("San Francisco", "United States"),
    city("Toronto", "Canada"),
    city("Montreal", "Canada"),
    city("Sydney", "Australia"),
    city("Melbourne", "Australia"),
    city("Tokyo", "Japan"),
    city("Seoul", "South Korea"),
    city("Singapore", "Singapore"),
];

/// City suggestions for partially typed input.
///
/// Matches city or country case-insensitively, up to six results; empty
/// input lists the first eight cities.
pub fn suggest_cities(input: &str) -> Vec<City> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return POPULAR_CITIES.iter().copied().take(8).collect();
    }
    POPULAR_CITIES
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&needle) || c.country.to_lowercase().contains(&needle))
        .copied()
        .take(6)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileLocation {
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSetupForm {
    pub location: ProfileLocation,
    pub bio: String,
    pub languages: Vec<String>,
    pub contact_method: ContactMethod,
}

impl Default for ProfileSetupForm {
    fn default() -> Self {
        Self {
            location: ProfileLocation::default(),
            bio: String::new(),
            languages: vec!["English".to_string()],
            contact_method: ContactMethod::default(),
        }
    }
}

impl FormFields for ProfileSetupForm {
    fn set_field(
        &mut self,
        path: &FieldPath<'_>,
        value: FieldValue,
    ) -> Result<(), FormError> {
        match (path.parent(), path.name()) {
            (Some("location"), "city") => self.location.city = value.into_text(path)?,
            (Some("location"), "country") => self.location.country = value.into_text(path)?,
            (None, "bio") => self.bio = value.into_text(path)?,
            (None, "contact_method") => {
                let raw = value.into_text(path)?;
                self.contact_method = ContactMethod::parse(&raw).ok_or_else(|| path.mismatch("email, phone or both"))?;
            }
            _ => return Err(path.unknown()),
        }
        Ok(())
    }

    fn list_field_mut(
        &mut self,
        path: &FieldPath<'_>,
    ) -> Option<&mut Vec<String>> {
        match path.as_str() {
            "languages" => Some(&mut self.languages),
            _ => None,
        }
    }
}

/// Picks a suggested city, filling in its country and clearing the city error.
pub fn select_city(
    store: &mut FormStore<ProfileSetupForm>,
    city: City,
) -> Result<(), FormError> {
    store.update("location.city", city.name)?;
    store.update("location.country", city.country)
}

pub fn validate_profile_setup(form: &ProfileSetupForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if form.location.city.trim().is_empty() {
        errors.insert("city", "Please select your city");
    }
    if form.languages.is_empty() {
        errors.insert("languages", "Please select at least one language");
    }
    errors.insert_opt("bio", validate_bio(&form.bio));
    errors
}

/// Saves the profile details. Success leads to onboarding step 2.
pub async fn submit_profile_setup(
    store: &mut FormStore<ProfileSetupForm>,
    repo: &dyn SwapRepository,
    user_id: &str,
) -> Option<Route> {
    store
        .submit(validate_profile_setup, |form| {
            let form = form.clone();
            async move {
                save_profile(repo, user_id, &form).await.map_err(|e| {
                    error!(error = %e, "failed to save profile setup");
                    ValidationErrors::general(GENERIC_FAILURE)
                })
            }
        })
        .await
        .completed()
        .map(|_| Route::Onboarding(2))
}

async fn save_profile(
    repo: &dyn SwapRepository,
    user_id: &str,
    form: &ProfileSetupForm,
) -> Result<(), RepositoryError> {
    let mut profile = super::load_profile_input(repo, user_id).await?;
    let location = [form.location.city.trim(), form.location.country.trim()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    profile.location = Some(location);
    profile.bio = Some(form.bio.trim().to_string()).filter(|b| !b.is_empty());
    profile.languages = form.languages.clone();
    profile.contact_method = Some(form.contact_method.as_str().to_string());
    repo.upsert_profile(profile).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::db::MemoryRepository;

    #[test]
    fn suggestions_match_city_or_country() {
        let names: Vec<_> = suggest_cities("germ").iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Berlin", "Munich", "Hamburg"]);

        assert_eq!(suggest_cities("").len(), 8);
        assert_eq!(suggest_cities("an").len(), 6);
    }

    #[test]
    fn city_and_language_are_required() {
        let mut form = ProfileSetupForm::default();
        form.languages.clear();

        let errors = validate_profile_setup(&form);

        assert_eq!(errors.get("city"), Some("Please select your city"));
        assert_eq!(errors.get("languages"), Some("Please select at least one language"));
    }

    #[test]
    fn selecting_a_city_clears_its_error() {
        let mut store = FormStore::new(ProfileSetupForm::default());
        store.validate_with(validate_profile_setup);
        assert!(store.error("city").is_some());

        select_city(&mut store, suggest_cities("lisb")[0]).unwrap();

        assert_eq!(store.error("city"), None);
        assert_eq!(store.data().location.country, "Portugal");
    }

    #[tokio::test]
    async fn submit_writes_profile_and_moves_to_step_two() {
        let repo = MemoryRepository::new();
        let mut store = FormStore::new(ProfileSetupForm::default());
        select_city(&mut store, suggest_cities("berlin")[0]).unwrap();
        store.toggle_array_member("languages", "German").unwrap();
        store.update("contact_method", "email").unwrap();

        let route = submit_profile_setup(&mut store, &repo, "u1").await;

        assert_eq!(route, Some(Route::Onboarding(2)));
        let profile = repo.get_profile("u1").await.unwrap();
        assert_eq!(profile.location.as_deref(), Some("Berlin, Germany"));
        assert_eq!(profile.languages, vec!["English", "German"]);
        assert_eq!(profile.contact_method.as_deref(), Some("email"));
    }
}
