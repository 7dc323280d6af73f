use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A saved swap search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Search {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub max_rent: Option<Decimal>,
    pub min_rooms: Option<u32>,
    pub max_rooms: Option<u32>,
    pub guests: Option<u32>,
    pub property_types: Vec<String>,
    pub amenities: Vec<String>,
    pub swap_duration: Option<String>,
    pub furnished: bool,
    pub pets_allowed: bool,
    pub smoking_allowed: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// For creating or replacing a search. A `None` id inserts a new record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSearch {
    pub id: Option<String>,
    pub user_id: String,
    pub title: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub max_rent: Option<Decimal>,
    pub min_rooms: Option<u32>,
    pub max_rooms: Option<u32>,
    pub guests: Option<u32>,
    pub property_types: Vec<String>,
    pub amenities: Vec<String>,
    pub swap_duration: Option<String>,
    pub furnished: bool,
    pub pets_allowed: bool,
    pub smoking_allowed: bool,
}
