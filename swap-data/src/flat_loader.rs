use std::io::Read;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use swap_core::{NewFlat, RepositoryError, SwapRepository};
use thiserror::Error;

/// Errors that can occur when importing flat listings.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Line {line}: {message}")]
    InvalidRecord { line: u64, message: String },

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for LoaderError {
    fn from(err: csv::Error) -> Self {
        LoaderError::CsvParse(err.to_string())
    }
}

/// A single listing from the flats CSV file.
///
/// Empty cells become `None`. `amenities` is a `;`-separated list of
/// amenity ids. A non-empty `id` makes re-imports replace the same row.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FlatRecord {
    pub id: Option<String>,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub rent_amount: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub deposit_amount: Option<Decimal>,
    pub available_from: Option<NaiveDate>,
    pub available_until: Option<NaiveDate>,
    pub room_count: Option<u32>,
    pub bathroom_count: Option<u32>,
    pub max_guests: Option<u32>,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub size_sqm: Option<Decimal>,
    pub furnished: bool,
    pub pets_allowed: bool,
    pub smoking_allowed: bool,
    #[serde(default)]
    pub amenities: String,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

impl FlatRecord {
    fn check(&self) -> Result<(), String> {
        if self.owner_id.trim().is_empty() {
            return Err("owner_id is required".to_string());
        }
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        for (name, value) in [
            ("rent_amount", self.rent_amount),
            ("deposit_amount", self.deposit_amount),
            ("size_sqm", self.size_sqm),
        ] {
            if value.is_some_and(|v| v.is_sign_negative()) {
                return Err(format!("{name} must not be negative"));
            }
        }
        if let (Some(from), Some(until)) = (self.available_from, self.available_until) {
            if until <= from {
                return Err("available_until must be after available_from".to_string());
            }
        }
        Ok(())
    }

    pub fn into_new_flat(self) -> NewFlat {
        let amenities = self
            .amenities
            .split(';')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect();
        NewFlat {
            id: self.id.filter(|id| !id.trim().is_empty()),
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
            address: self.address,
            city: self.city,
            country: self.country,
            postal_code: self.postal_code,
            rent_amount: self.rent_amount,
            deposit_amount: self.deposit_amount,
            available_from: self.available_from,
            available_until: self.available_until,
            room_count: self.room_count,
            bathroom_count: self.bathroom_count,
            max_guests: self.max_guests,
            size_sqm: self.size_sqm,
            furnished: self.furnished,
            pets_allowed: self.pets_allowed,
            smoking_allowed: self.smoking_allowed,
            amenities,
            images: Vec::new(),
        }
    }
}

/// Bulk import of flat listings through any [`SwapRepository`] backend.
pub struct FlatLoader;

impl FlatLoader {
    /// Parse and check every row. The first bad row aborts the parse, so
    /// nothing is written for a file with errors.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<FlatRecord>, LoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut records = Vec::new();

        for result in csv_reader.records() {
            let row = result?;
            let line = row.position().map_or(0, |p| p.line());
            let record: FlatRecord = row.deserialize(Some(&headers))?;
            record
                .check()
                .map_err(|message| LoaderError::InvalidRecord { line, message })?;
            records.push(record);
        }

        Ok(records)
    }

    /// Upsert each record and return how many were written.
    ///
    /// Records with an id replace the stored listing, so loading the same
    /// file twice leaves one copy of each identified row.
    pub async fn load<R: SwapRepository + ?Sized>(
        repo: &R,
        records: &[FlatRecord],
    ) -> Result<usize, LoaderError> {
        let mut written = 0;
        for record in records {
            let flat = repo.upsert_flat(record.clone().into_new_flat()).await?;
            tracing::debug!(id = %flat.id, title = %flat.title, "flat imported");
            written += 1;
        }
        tracing::info!(written, "flat import complete");
        Ok(written)
    }
}
