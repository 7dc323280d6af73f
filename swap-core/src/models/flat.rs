use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A listed property owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flat {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub rent_amount: Option<Decimal>,
    pub deposit_amount: Option<Decimal>,
    pub available_from: Option<NaiveDate>,
    pub available_until: Option<NaiveDate>,

    // Features
    pub room_count: Option<u32>,
    pub bathroom_count: Option<u32>,
    pub max_guests: Option<u32>,
    pub size_sqm: Option<Decimal>,
    pub furnished: bool,
    pub pets_allowed: bool,
    pub smoking_allowed: bool,
    pub amenities: Vec<String>,
    pub images: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// For creating or replacing a flat. A `None` id inserts a new record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFlat {
    pub id: Option<String>,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub rent_amount: Option<Decimal>,
    pub deposit_amount: Option<Decimal>,
    pub available_from: Option<NaiveDate>,
    pub available_until: Option<NaiveDate>,
    pub room_count: Option<u32>,
    pub bathroom_count: Option<u32>,
    pub max_guests: Option<u32>,
    pub size_sqm: Option<Decimal>,
    pub furnished: bool,
    pub pets_allowed: bool,
    pub smoking_allowed: bool,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
}

impl Flat {
    /// "City, Country" with whichever parts are present.
    pub fn location(&self) -> String {
        [self.city.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
