use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    New,
    Pending,
    Accepted,
    Rejected,
}

impl MatchStatus {
    pub const ALL: [MatchStatus; 4] = [Self::New, Self::Pending, Self::Accepted, Self::Rejected];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-party swap or a ring of three or more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Bilateral,
    Multilateral,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bilateral => "bilateral",
            Self::Multilateral => "multilateral",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchProperty {
    pub title: String,
    pub location: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub guests: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchParticipant {
    pub id: String,
    pub name: String,
    pub location: String,
    /// `None` until the participant has answered.
    pub has_accepted: Option<bool>,
    pub property: MatchProperty,
    pub swap_dates: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapMatch {
    pub id: String,
    pub status: MatchStatus,
    pub kind: MatchKind,
    pub score: u8,
    pub created: String,
    pub participants: Vec<MatchParticipant>,
}

impl SwapMatch {
    /// Participants other than `user_id`.
    pub fn others<'a>(
        &'a self,
        user_id: &'a str,
    ) -> impl Iterator<Item = &'a MatchParticipant> + 'a {
        self.participants.iter().filter(move |p| p.id != user_id)
    }

    pub fn accepted_count(&self) -> usize {
        self.participants
            .iter()
            .filter(|p| p.has_accepted == Some(true))
            .count()
    }
}

/// Matches with the given status, or all of them when `status` is `None`.
pub fn filter_matches(
    matches: &[SwapMatch],
    status: Option<MatchStatus>,
) -> Vec<&SwapMatch> {
    matches
        .iter()
        .filter(|m| status.is_none_or(|s| m.status == s))
        .collect()
}

/// Number of matches per status, in [`MatchStatus::ALL`] order.
pub fn count_by_status(matches: &[SwapMatch]) -> Vec<(MatchStatus, usize)> {
    MatchStatus::ALL
        .iter()
        .map(|&status| (status, matches.iter().filter(|m| m.status == status).count()))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn swap(
        id: &str,
        status: MatchStatus,
    ) -> SwapMatch {
        SwapMatch {
            id: id.to_string(),
            status,
            kind: MatchKind::Bilateral,
            score: 90,
            created: "today".to_string(),
            participants: Vec::new(),
        }
    }

    #[test]
    fn filter_by_status_keeps_order() {
        let matches = vec![
            swap("1", MatchStatus::New),
            swap("2", MatchStatus::Pending),
            swap("3", MatchStatus::New),
        ];

        let ids: Vec<_> = filter_matches(&matches, Some(MatchStatus::New))
            .into_iter()
            .map(|m| m.id.as_str())
            .collect();

        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(filter_matches(&matches, None).len(), 3);
    }

    #[test]
    fn counts_include_empty_statuses() {
        let matches = vec![swap("1", MatchStatus::Accepted)];

        assert_eq!(
            count_by_status(&matches),
            vec![
                (MatchStatus::New, 0),
                (MatchStatus::Pending, 0),
                (MatchStatus::Accepted, 1),
                (MatchStatus::Rejected, 0),
            ]
        );
    }
}
