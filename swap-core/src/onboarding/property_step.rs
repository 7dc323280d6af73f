use tracing::{error, info};

use crate::auth::service::GENERIC_FAILURE;
use crate::auth::{AuthService, Route};
use crate::db::SwapRepository;
use crate::forms::{FieldPath, FieldValue, FormError, FormFields, FormStore, ValidationErrors};
use crate::listings::{PropertyForm, validate_property};
use crate::models::Flat;

/// Onboarding step 3. The property fields are only filled in, and only
/// validated, when the user says they have a place to offer.
///
/// Paths other than `has_property` address the embedded [`PropertyForm`]
/// directly, so `location.city` works here as it does on the add-property
/// page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySetupForm {
    pub has_property: bool,
    pub property: PropertyForm,
}

impl FormFields for PropertySetupForm {
    fn set_field(
        &mut self,
        path: &FieldPath<'_>,
        value: FieldValue,
    ) -> Result<(), FormError> {
        match path.as_str() {
            "has_property" => {
                self.has_property = value.into_flag(path)?;
                Ok(())
            }
            _ => self.property.set_field(path, value),
        }
    }

    fn list_field_mut(
        &mut self,
        path: &FieldPath<'_>,
    ) -> Option<&mut Vec<String>> {
        self.property.list_field_mut(path)
    }
}

pub fn validate_property_setup(form: &PropertySetupForm) -> ValidationErrors {
    if form.has_property {
        validate_property(&form.property)
    } else {
        ValidationErrors::new()
    }
}

/// Saves the optional property and marks onboarding complete. Success
/// leads to the profile page.
pub async fn submit_property_setup(
    store: &mut FormStore<PropertySetupForm>,
    repo: &dyn SwapRepository,
    auth: &dyn AuthService,
    user_id: &str,
) -> Option<(Option<Flat>, Route)> {
    store
        .submit(validate_property_setup, |form| {
            let flat = form.has_property.then(|| form.property.to_new_flat(user_id));
            async move {
                let saved = match flat {
                    Some(flat) => Some(repo.upsert_flat(flat).await.map_err(|e| {
                        error!(error = %e, "failed to save onboarding property");
                        ValidationErrors::general(GENERIC_FAILURE)
                    })?),
                    None => None,
                };
                finish_onboarding(repo, auth, user_id).await?;
                Ok(saved)
            }
        })
        .await
        .completed()
        .map(|flat| (flat, Route::Profile))
}

/// Marks onboarding complete on both the account and the stored profile.
pub async fn finish_onboarding(
    repo: &dyn SwapRepository,
    auth: &dyn AuthService,
    user_id: &str,
) -> Result<(), ValidationErrors> {
    auth.complete_onboarding(user_id).await.map_err(|e| {
        error!(error = %e, "failed to complete onboarding");
        e.to_form_errors()
    })?;

    let stored = async {
        let mut profile = super::load_profile_input(repo, user_id).await?;
        profile.onboarding_completed = true;
        repo.upsert_profile(profile).await
    };
    stored.await.map_err(|e| {
        error!(error = %e, "failed to store onboarding completion");
        ValidationErrors::general(GENERIC_FAILURE)
    })?;

    info!(user_id, "onboarding complete");
    Ok(())
}

pub fn skip_route() -> Route {
    Route::Profile
}

pub fn back_route() -> Route {
    Route::Onboarding(2)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::auth::SimulatedAuthService;
    use crate::db::MemoryRepository;

    #[test]
    fn property_fields_only_validated_when_offered() {
        let mut form = PropertySetupForm::default();
        assert!(validate_property_setup(&form).is_empty());

        form.has_property = true;
        assert!(validate_property_setup(&form).contains("title"));
    }

    #[test]
    fn paths_reach_the_embedded_property() {
        let mut store = FormStore::new(PropertySetupForm::default());
        store.update("has_property", true).unwrap();
        store.update("location.city", "Rome").unwrap();
        store.toggle_array_member("amenities", "WiFi").unwrap();

        assert!(store.data().has_property);
        assert_eq!(store.data().property.location.city, "Rome");
        assert_eq!(store.data().property.amenities, vec!["WiFi"]);
    }

    #[tokio::test]
    async fn submit_without_property_completes_onboarding() {
        let repo = MemoryRepository::new();
        let auth = SimulatedAuthService::new(Duration::ZERO);
        let mut store = FormStore::new(PropertySetupForm::default());

        let (flat, route) = submit_property_setup(&mut store, &repo, &auth, "u1").await.unwrap();

        assert_eq!(flat, None);
        assert_eq!(route.path(), "/profile");
        assert!(repo.get_profile("u1").await.unwrap().onboarding_completed);
    }

    #[tokio::test]
    async fn submit_with_property_saves_the_flat() {
        let repo = MemoryRepository::new();
        let auth = SimulatedAuthService::new(Duration::ZERO);
        let mut store = FormStore::new(PropertySetupForm::default());
        store.update("has_property", true).unwrap();
        store.update("title", "Historic Villa in Trastevere").unwrap();
        store.update("description", "Three bedrooms near the river").unwrap();
        store.update("location.address", "Via della Lungaretta 5").unwrap();
        store.update("location.city", "Rome").unwrap();
        store.update("location.country", "Italy").unwrap();

        let (flat, _) = submit_property_setup(&mut store, &repo, &auth, "u1").await.unwrap();

        let flat = flat.unwrap();
        assert_eq!(repo.list_flats("u1").await.unwrap()[0].id, flat.id);
    }

    #[tokio::test]
    async fn invalid_property_blocks_submit() {
        let repo = MemoryRepository::new();
        let auth = SimulatedAuthService::new(Duration::ZERO);
        let mut store = FormStore::new(PropertySetupForm {
            has_property: true,
            ..PropertySetupForm::default()
        });

        assert_eq!(submit_property_setup(&mut store, &repo, &auth, "u1").await, None);
        assert_eq!(store.error("address"), Some("Address is required"));
        assert!(repo.get_profile("u1").await.is_err());
    }
}
