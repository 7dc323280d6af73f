use tracing::{error, warn};

use super::MAX_PHOTOS;
use super::amenities::{PETS_ALLOWED, SMOKING_ALLOWED};
use crate::auth::Route;
use crate::auth::validation::validate_location;
use crate::common::parse_optional_decimal;
use crate::db::SwapRepository;
use crate::forms::{FieldPath, FieldValue, FormError, FormFields, FormStore, ValidationErrors};
use crate::models::{Flat, NewFlat};

pub const MAX_PHOTOS_MESSAGE: &str = "Maximum 10 photos allowed";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyLocation {
    pub address: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyFeatures {
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub guests: u32,
    /// Square metres as typed; may be empty.
    pub size: String,
}

impl Default for PropertyFeatures {
    fn default() -> Self {
        Self {
            bedrooms: 1,
            bathrooms: 1,
            guests: 2,
            size: String::new(),
        }
    }
}

/// Add-property form, also used by onboarding step 3.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyForm {
    pub title: String,
    pub description: String,
    pub location: PropertyLocation,
    pub features: PropertyFeatures,
    pub amenities: Vec<String>,
    /// Photo file names, in upload order.
    pub photos: Vec<String>,
}

impl FormFields for PropertyForm {
    fn set_field(
        &mut self,
        path: &FieldPath<'_>,
        value: FieldValue,
    ) -> Result<(), FormError> {
        match (path.parent(), path.name()) {
            (None, "title") => self.title = value.into_text(path)?,
            (None, "description") => self.description = value.into_text(path)?,
            (Some("location"), "address") => self.location.address = value.into_text(path)?,
            (Some("location"), "city") => self.location.city = value.into_text(path)?,
            (Some("location"), "country") => self.location.country = value.into_text(path)?,
            (Some("features"), "bedrooms") => self.features.bedrooms = value.into_count(path)?,
            (Some("features"), "bathrooms") => self.features.bathrooms = value.into_count(path)?,
            (Some("features"), "guests") => self.features.guests = value.into_count(path)?,
            (Some("features"), "size") => self.features.size = value.into_text(path)?,
            _ => return Err(path.unknown()),
        }
        Ok(())
    }

    fn list_field_mut(
        &mut self,
        path: &FieldPath<'_>,
    ) -> Option<&mut Vec<String>> {
        match path.as_str() {
            "amenities" => Some(&mut self.amenities),
            _ => None,
        }
    }
}

impl PropertyForm {
    /// Converts the form into a flat record owned by `owner_id`.
    pub fn to_new_flat(
        &self,
        owner_id: &str,
    ) -> NewFlat {
        let text = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());
        NewFlat {
            id: None,
            owner_id: owner_id.to_string(),
            title: self.title.trim().to_string(),
            description: text(&self.description),
            address: text(&self.location.address),
            city: text(&self.location.city),
            country: text(&self.location.country),
            room_count: Some(self.features.bedrooms),
            bathroom_count: Some(self.features.bathrooms),
            max_guests: Some(self.features.guests),
            size_sqm: parse_optional_decimal(&self.features.size),
            pets_allowed: self.amenities.iter().any(|a| a == PETS_ALLOWED),
            smoking_allowed: self.amenities.iter().any(|a| a == SMOKING_ALLOWED),
            amenities: self.amenities.clone(),
            images: self.photos.clone(),
            ..NewFlat::default()
        }
    }
}

pub fn validate_property(form: &PropertyForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if form.title.trim().is_empty() {
        errors.insert("title", "Property title is required");
    }
    if form.description.trim().is_empty() {
        errors.insert("description", "Property description is required");
    }
    errors.merge(validate_location(&form.location.city, &form.location.country));
    if form.location.address.trim().is_empty() {
        errors.insert("address", "Address is required");
    }
    errors
}

/// Appends photos unless the total would exceed [`MAX_PHOTOS`], in which
/// case nothing is added and the form shows only the photo limit error.
pub fn add_photos<F: FormFields>(
    store: &mut FormStore<F>,
    photos: impl IntoIterator<Item = String>,
    current: impl Fn(&mut F) -> &mut Vec<String>,
) -> bool {
    let photos: Vec<String> = photos.into_iter().collect();
    let list = current(store.data_mut());
    if list.len() + photos.len() > MAX_PHOTOS {
        warn!(existing = list.len(), adding = photos.len(), "photo limit exceeded");
        store.set_errors(ValidationErrors::single("photos", MAX_PHOTOS_MESSAGE));
        return false;
    }
    list.extend(photos);
    true
}

/// Removes the photo at `index`; out-of-range indices are ignored.
pub fn remove_photo(
    photos: &mut Vec<String>,
    index: usize,
) {
    if index < photos.len() {
        photos.remove(index);
    }
}

/// Saves the property. Success leads to the property list.
pub async fn submit_property(
    store: &mut FormStore<PropertyForm>,
    repo: &dyn SwapRepository,
    owner_id: &str,
) -> Option<(Flat, Route)> {
    store
        .submit(validate_property, |form| {
            let flat = form.to_new_flat(owner_id);
            async move {
                repo.upsert_flat(flat).await.map_err(|e| {
                    error!(error = %e, "failed to save property");
                    ValidationErrors::general("Failed to create property")
                })
            }
        })
        .await
        .completed()
        .map(|flat| (flat, Route::Properties))
}
