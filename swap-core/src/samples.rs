//! Fixed demonstration data: the match list, the conversation parties a
//! contract can be created from, and example contract summaries.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use rust_decimal::Decimal;

use crate::contract::{ContractUser, ConversationParties, UserProperty};
use crate::models::{ContractStatus, ContractSummary, MatchKind, MatchParticipant, MatchProperty, MatchStatus, SwapMatch};

/// Id the sample matches use for the signed-in user.
pub const CURRENT_USER_ID: &str = "currentUser";

fn property(
    title: &str,
    location: &str,
    bedrooms: u32,
    bathrooms: u32,
    guests: u32,
) -> MatchProperty {
    MatchProperty {
        title: title.to_string(),
        location: location.to_string(),
        bedrooms,
        bathrooms,
        guests,
    }
}

fn participant(
    id: &str,
    name: &str,
    has_accepted: Option<bool>,
    property: MatchProperty,
    swap_dates: &str,
    email: Option<&str>,
) -> MatchParticipant {
    MatchParticipant {
        id: id.to_string(),
        name: name.to_string(),
        location: property.location.clone(),
        has_accepted,
        property,
        swap_dates: swap_dates.to_string(),
        email: email.map(str::to_string),
    }
}

fn you(
    has_accepted: Option<bool>,
    swap_dates: &str,
) -> MatchParticipant {
    participant(
        CURRENT_USER_ID,
        "You",
        has_accepted,
        property("Manhattan Loft", "New York, USA", 1, 1, 2),
        swap_dates,
        None,
    )
}

pub fn sample_matches() -> Vec<SwapMatch> {
    vec![
        SwapMatch {
            id: "1".to_string(),
            status: MatchStatus::New,
            kind: MatchKind::Bilateral,
            score: 95,
            created: "2 hours ago".to_string(),
            participants: vec![
                participant(
                    "user1",
                    "Sarah Johnson",
                    None,
                    property("Cozy Apartment Near Beach", "Barcelona, Spain", 2, 1, 4),
                    "Mar 15-25, 2024",
                    Some("sarah.j@email.com"),
                ),
                you(None, "Apr 10-20, 2024"),
            ],
        },
        SwapMatch {
            id: "2".to_string(),
            status: MatchStatus::Pending,
            kind: MatchKind::Multilateral,
            score: 89,
            created: "1 day ago".to_string(),
            participants: vec![
                participant(
                    "user2",
                    "Marco Rodriguez",
                    Some(true),
                    property("Historic Villa in Trastevere", "Rome, Italy", 3, 2, 6),
                    "Jun 5-15, 2024",
                    Some("marco.r@email.com"),
                ),
                participant(
                    "user3",
                    "Emma Wilson",
                    Some(false),
                    property("Modern Flat in Shoreditch", "London, UK", 1, 1, 2),
                    "Jun 1-10, 2024",
                    Some("emma.w@email.com"),
                ),
                you(Some(true), "Jun 12-22, 2024"),
            ],
        },
        SwapMatch {
            id: "3".to_string(),
            status: MatchStatus::Accepted,
            kind: MatchKind::Bilateral,
            score: 92,
            created: "3 days ago".to_string(),
            participants: vec![
                participant(
                    "user4",
                    "Alex Chen",
                    Some(true),
                    property("Minimalist Studio in Shibuya", "Tokyo, Japan", 1, 1, 2),
                    "Feb 20-28, 2024",
                    Some("alex.chen@email.com"),
                ),
                you(Some(true), "Feb 20-28, 2024"),
            ],
        },
        SwapMatch {
            id: "4".to_string(),
            status: MatchStatus::Rejected,
            kind: MatchKind::Bilateral,
            score: 78,
            created: "1 week ago".to_string(),
            participants: vec![
                participant(
                    "user5",
                    "Lisa Wang",
                    None,
                    property("Modern Apartment in Mitte", "Berlin, Germany", 2, 1, 3),
                    "Mar 1-10, 2024",
                    Some("lisa.w@email.com"),
                ),
                you(None, "Mar 1-10, 2024"),
            ],
        },
    ]
}

fn alex(with_description: bool) -> ContractUser {
    ContractUser {
        name: "Alex Johnson".to_string(),
        email: Some("alex.johnson@email.com".to_string()),
        location: "Berlin, Germany".to_string(),
        property: Some(UserProperty {
            id: "1".to_string(),
            title: "Berlin Altbau".to_string(),
            location: "Friedrichshain, Berlin, Germany".to_string(),
            bedrooms: 2,
            bathrooms: 1,
            rent: Some(Decimal::from(1200)),
            description: with_description.then(|| {
                "Beautiful Altbau flat in the heart of Berlin, perfect for couples or small families.".to_string()
            }),
        }),
    }
}

/// Parties of a sample conversation. Unknown ids fall back to conversation
/// `"1"`.
pub fn conversation_parties(conversation_id: &str) -> ConversationParties {
    match conversation_id {
        "2" => ConversationParties {
            current_user: alex(false),
            other_user: ContractUser {
                name: "Marco Rodriguez".to_string(),
                email: Some("marco.rodriguez@email.com".to_string()),
                location: "Rome, Italy".to_string(),
                property: Some(UserProperty {
                    id: "3".to_string(),
                    title: "Historic Villa in Trastevere".to_string(),
                    location: "Trastevere, Rome, Italy".to_string(),
                    bedrooms: 3,
                    bathrooms: 2,
                    rent: Some(Decimal::from(1400)),
                    description: None,
                }),
            },
        },
        _ => ConversationParties {
            current_user: alex(true),
            other_user: ContractUser {
                name: "Carlos Gomez".to_string(),
                email: Some("carlos.gomez@email.com".to_string()),
                location: "Barcelona, Spain".to_string(),
                property: Some(UserProperty {
                    id: "2".to_string(),
                    title: "Cozy Apartment Near Beach".to_string(),
                    location: "Barceloneta, Barcelona, Spain".to_string(),
                    bedrooms: 2,
                    bathrooms: 1,
                    rent: Some(Decimal::from(950)),
                    description: Some(
                        "2-bedroom apartment just 5 minutes from the beach with modern amenities.".to_string(),
                    ),
                }),
            },
        },
    }
}

/// Example dashboard contracts, created relative to `now`.
pub fn sample_contract_summaries(now: DateTime<Utc>) -> Vec<ContractSummary> {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);
    let summary = |id: &str, title: &str, other: &str, status, age: TimeDelta| ContractSummary {
        id: id.to_string(),
        title: title.to_string(),
        other_party: other.to_string(),
        status,
        created_at: now - age,
        start_date: None,
        end_date: None,
        conversation_id: None,
    };

    vec![
        ContractSummary {
            start_date: date(2025, 3, 15),
            conversation_id: Some("1".to_string()),
            ..summary("1", "Berlin ↔ Barcelona Swap", "Carlos Martinez", ContractStatus::Pending, TimeDelta::days(2))
        },
        ContractSummary {
            start_date: date(2025, 4, 5),
            conversation_id: Some("2".to_string()),
            ..summary("2", "Berlin ↔ Rome Swap", "Marco Rodriguez", ContractStatus::Active, TimeDelta::weeks(1))
        },
        summary("3", "Berlin ↔ London Swap", "Emma Wilson", ContractStatus::Draft, TimeDelta::weeks(3)),
        ContractSummary {
            start_date: date(2025, 1, 10),
            end_date: date(2025, 1, 20),
            ..summary("4", "Berlin ↔ Tokyo Swap", "Alex Chen", ContractStatus::Completed, TimeDelta::days(60))
        },
    ]
}
