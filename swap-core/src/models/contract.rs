use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    Draft,
    #[default]
    Pending,
    Active,
    Completed,
    Terminated,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Terminated => "terminated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "pending" => Some(Self::Pending),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "terminated" => Some(Self::Terminated),
            _ => None,
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    pub user_id: String,
    pub flat_id: Option<String>,
    pub conversation_id: Option<String>,
    pub landlord_name: Option<String>,
    pub tenant_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub monthly_rent: Option<Decimal>,
    pub deposit_amount: Option<Decimal>,
    pub platform_fee_percentage: Option<Decimal>,
    pub status: ContractStatus,
    /// Where the exported contract text was written, if it was exported.
    pub contract_file: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// For creating or replacing a contract. A `None` id inserts a new record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContract {
    pub id: Option<String>,
    pub user_id: String,
    pub flat_id: Option<String>,
    pub conversation_id: Option<String>,
    pub landlord_name: Option<String>,
    pub tenant_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub monthly_rent: Option<Decimal>,
    pub deposit_amount: Option<Decimal>,
    pub platform_fee_percentage: Option<Decimal>,
    pub status: ContractStatus,
    pub contract_file: Option<String>,
}

/// Dashboard view of a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSummary {
    pub id: String,
    pub title: String,
    pub other_party: String,
    pub status: ContractStatus,
    pub created_at: DateTime<Utc>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub conversation_id: Option<String>,
}

impl ContractSummary {
    /// Builds a summary, using the linked flat's title when there is one.
    ///
    /// Falls back to "Contract" for the title and to the landlord, then the
    /// tenant, then "Unknown" for the other party.
    pub fn from_contract(
        contract: &Contract,
        flat_title: Option<&str>,
    ) -> Self {
        let title = flat_title
            .filter(|t| !t.is_empty())
            .unwrap_or("Contract")
            .to_string();
        let other_party = [contract.landlord_name.as_deref(), contract.tenant_name.as_deref()]
            .into_iter()
            .flatten()
            .find(|name| !name.is_empty())
            .unwrap_or("Unknown")
            .to_string();

        Self {
            id: contract.id.clone(),
            title,
            other_party,
            status: contract.status,
            created_at: contract.created_at,
            start_date: contract.start_date,
            end_date: contract.end_date,
            conversation_id: contract.conversation_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn contract() -> Contract {
        Contract {
            id: "c1".to_string(),
            user_id: "u1".to_string(),
            flat_id: None,
            conversation_id: Some("1".to_string()),
            landlord_name: None,
            tenant_name: Some("John Doe".to_string()),
            start_date: None,
            end_date: None,
            monthly_rent: None,
            deposit_amount: None,
            platform_fee_percentage: None,
            status: ContractStatus::Active,
            contract_file: None,
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        }
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            ContractStatus::Draft,
            ContractStatus::Pending,
            ContractStatus::Active,
            ContractStatus::Completed,
            ContractStatus::Terminated,
        ] {
            assert_eq!(ContractStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ContractStatus::parse("signed"), None);
    }

    #[test]
    fn summary_falls_back_to_defaults() {
        let summary = ContractSummary::from_contract(&contract(), None);

        assert_eq!(summary.title, "Contract");
        assert_eq!(summary.other_party, "John Doe");
        assert_eq!(summary.status, ContractStatus::Active);
    }

    #[test]
    fn summary_prefers_landlord_and_flat_title() {
        let mut c = contract();
        c.landlord_name = Some("Jane Smith".to_string());

        let summary = ContractSummary::from_contract(&c, Some("Modern 2BR Apartment"));

        assert_eq!(summary.title, "Modern 2BR Apartment");
        assert_eq!(summary.other_party, "Jane Smith");
    }

    #[test]
    fn summary_other_party_unknown_when_no_names() {
        let mut c = contract();
        c.tenant_name = Some(String::new());

        assert_eq!(ContractSummary::from_contract(&c, None).other_party, "Unknown");
    }

    #[test]
    fn default_status_is_pending() {
        assert_eq!(ContractStatus::default(), ContractStatus::Pending);
    }
}
