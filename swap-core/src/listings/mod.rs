//! Property listings and saved searches.

pub mod amenities;
pub mod property_form;
pub mod search_form;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use property_form::{PropertyForm, submit_property, validate_property};
pub use search_form::{SearchForm, submit_search, validate_search};

pub const MAX_PHOTOS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    EntireFlat,
    PrivateRoom,
    SharedRoom,
}

impl PropertyType {
    pub const ALL: [PropertyType; 3] = [Self::EntireFlat, Self::PrivateRoom, Self::SharedRoom];

    pub fn id(&self) -> &'static str {
        match self {
            Self::EntireFlat => "entire_flat",
            Self::PrivateRoom => "private_room",
            Self::SharedRoom => "shared_room",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::EntireFlat => "Entire Flat/Apartment",
            Self::PrivateRoom => "Private Room",
            Self::SharedRoom => "Shared Room",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::EntireFlat => "You have the whole place to yourself",
            Self::PrivateRoom => "Your own room in a shared flat",
            Self::SharedRoom => "Share a room with others",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }
}

/// How long a searcher wants to swap for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapDuration {
    #[default]
    #[serde(rename = "flexible")]
    Flexible,
    #[serde(rename = "1-7_days")]
    UpToAWeek,
    #[serde(rename = "1-2_weeks")]
    OneToTwoWeeks,
    #[serde(rename = "2-4_weeks")]
    TwoToFourWeeks,
    #[serde(rename = "1-3_months")]
    OneToThreeMonths,
    #[serde(rename = "3-6_months")]
    ThreeToSixMonths,
    #[serde(rename = "6+_months")]
    OverSixMonths,
}

impl SwapDuration {
    pub const ALL: [SwapDuration; 7] = [
        Self::Flexible,
        Self::UpToAWeek,
        Self::OneToTwoWeeks,
        Self::TwoToFourWeeks,
        Self::OneToThreeMonths,
        Self::ThreeToSixMonths,
        Self::OverSixMonths,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            Self::Flexible => "flexible",
            Self::UpToAWeek => "1-7_days",
            Self::OneToTwoWeeks => "1-2_weeks",
            Self::TwoToFourWeeks => "2-4_weeks",
            Self::OneToThreeMonths => "1-3_months",
            Self::ThreeToSixMonths => "3-6_months",
            Self::OverSixMonths => "6+_months",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Flexible => "Flexible",
            Self::UpToAWeek => "1-7 days",
            Self::OneToTwoWeeks => "1-2 weeks",
            Self::TwoToFourWeeks => "2-4 weeks",
            Self::OneToThreeMonths => "1-3 months",
            Self::ThreeToSixMonths => "3-6 months",
            Self::OverSixMonths => "6+ months",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.value() == value)
    }
}

impl fmt::Display for SwapDuration {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}
