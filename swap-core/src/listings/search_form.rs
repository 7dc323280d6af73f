use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::error;

use super::{PropertyType, SwapDuration};
use crate::auth::Route;
use crate::db::SwapRepository;
use crate::forms::{FieldPath, FieldValue, FormError, FormFields, FormStore, ValidationErrors};
use crate::models::{NewSearch, Search};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchLocation {
    pub city: String,
    pub country: String,
}

/// Dates as entered, `YYYY-MM-DD`; empty until chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub property_types: Vec<String>,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub min_size: Option<Decimal>,
    pub max_size: Option<Decimal>,
    pub max_budget: Option<Decimal>,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            property_types: Vec::new(),
            bedrooms: 1,
            bathrooms: 1,
            min_size: None,
            max_size: None,
            max_budget: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub name: String,
    pub location: SearchLocation,
    pub date_range: DateRange,
    pub criteria: SearchCriteria,
    pub amenities: Vec<String>,
    pub swap_duration: SwapDuration,
}

impl FormFields for SearchForm {
    fn set_field(
        &mut self,
        path: &FieldPath<'_>,
        value: FieldValue,
    ) -> Result<(), FormError> {
        match (path.parent(), path.name()) {
            (None, "name") => self.name = value.into_text(path)?,
            (None, "swap_duration") => {
                let raw = value.into_text(path)?;
                self.swap_duration = SwapDuration::parse(&raw).ok_or_else(|| path.mismatch("a swap duration"))?;
            }
            (Some("location"), "city") => self.location.city = value.into_text(path)?,
            (Some("location"), "country") => self.location.country = value.into_text(path)?,
            (Some("date_range"), "start_date") => self.date_range.start_date = value.into_text(path)?,
            (Some("date_range"), "end_date") => self.date_range.end_date = value.into_text(path)?,
            (Some("criteria"), "bedrooms") => self.criteria.bedrooms = value.into_count(path)?,
            (Some("criteria"), "bathrooms") => self.criteria.bathrooms = value.into_count(path)?,
            (Some("criteria"), "min_size") => self.criteria.min_size = value.into_optional_number(path)?,
            (Some("criteria"), "max_size") => self.criteria.max_size = value.into_optional_number(path)?,
            (Some("criteria"), "max_budget") => self.criteria.max_budget = value.into_optional_number(path)?,
            _ => return Err(path.unknown()),
        }
        Ok(())
    }

    fn list_field_mut(
        &mut self,
        path: &FieldPath<'_>,
    ) -> Option<&mut Vec<String>> {
        match (path.parent(), path.name()) {
            (Some("criteria"), "property_types") => Some(&mut self.criteria.property_types),
            (None, "amenities") => Some(&mut self.amenities),
            _ => None,
        }
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

impl SearchForm {
    pub fn start_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date_range.start_date)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date_range.end_date)
    }

    pub fn property_types(&self) -> impl Iterator<Item = PropertyType> + '_ {
        self.criteria
            .property_types
            .iter()
            .filter_map(|id| PropertyType::parse(id))
    }

    /// Converts the form into a saved search for `user_id`.
    ///
    /// An empty name becomes "Swap in {city}".
    pub fn to_new_search(
        &self,
        user_id: &str,
    ) -> NewSearch {
        let city = self.location.city.trim();
        let title = match self.name.trim() {
            "" => format!("Swap in {city}"),
            name => name.to_string(),
        };
        NewSearch {
            id: None,
            user_id: user_id.to_string(),
            title,
            city: Some(city.to_string()).filter(|c| !c.is_empty()),
            country: Some(self.location.country.trim().to_string()).filter(|c| !c.is_empty()),
            start_date: self.start_date(),
            end_date: self.end_date(),
            max_rent: self.criteria.max_budget,
            min_rooms: Some(self.criteria.bedrooms),
            max_rooms: None,
            guests: None,
            property_types: self.criteria.property_types.clone(),
            amenities: self.amenities.clone(),
            swap_duration: Some(self.swap_duration.value().to_string()),
            furnished: false,
            pets_allowed: self.amenities.iter().any(|a| a == "Pet Friendly"),
            smoking_allowed: false,
        }
    }
}

/// Date ordering is checked only once both dates are present.
pub fn validate_search(form: &SearchForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if form.location.city.trim().is_empty() {
        errors.insert("city", "Destination city is required");
    }

    let start = &form.date_range.start_date;
    let end = &form.date_range.end_date;
    if start.trim().is_empty() {
        errors.insert("start_date", "Start date is required");
    } else if form.start_date().is_none() {
        errors.insert("start_date", "Please enter a valid date");
    }
    if end.trim().is_empty() {
        errors.insert("end_date", "End date is required");
    } else if form.end_date().is_none() {
        errors.insert("end_date", "Please enter a valid date");
    }
    if let (Some(start), Some(end)) = (form.start_date(), form.end_date()) {
        if start >= end {
            errors.insert("end_date", "End date must be after start date");
        }
    }

    if form.criteria.property_types.is_empty() {
        errors.insert("property_types", "Please select at least one property type");
    }
    errors
}

/// Saves the search. Success leads to the search list.
pub async fn submit_search(
    store: &mut FormStore<SearchForm>,
    repo: &dyn SwapRepository,
    user_id: &str,
) -> Option<(Search, Route)> {
    store
        .submit(validate_search, |form| {
            let search = form.to_new_search(user_id);
            async move {
                repo.upsert_search(search).await.map_err(|e| {
                    error!(error = %e, "failed to save search");
                    ValidationErrors::general("Failed to create search. Please try again.")
                })
            }
        })
        .await
        .completed()
        .map(|search| (search, Route::Searches))
}
