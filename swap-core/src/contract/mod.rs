//! The six-step contract wizard: participants, properties, timeline,
//! pricing, terms and review.

pub mod duration;
pub mod export;
pub mod form;
pub mod prefill;
pub mod pricing;
pub mod review;

use tracing::{error, info};

use crate::common::parse_optional_decimal;
use crate::db::{RepositoryError, SwapRepository};
use crate::forms::Wizard;
use crate::models::{Contract, ContractStatus, NewContract};

pub use duration::{days_between, describe_duration};
pub use export::{
    ContractMeta, DirectorySink, DownloadSink, ExportError, export_contract, export_filename, generate_contract,
};
pub use form::{ContractFormData, STEP_TITLES, step_errors};
pub use prefill::{ContractUser, ConversationParties, UserProperty, prefill_form};
pub use pricing::{DEFAULT_PLATFORM_FEE_PERCENTAGE, PricingBreakdown, calculate_pricing, platform_fee};
pub use review::ContractReview;

pub type ContractWizard = Wizard<ContractFormData>;

/// The record stored for a finished wizard. The other tenant is recorded as
/// the landlord of the property the user moves into.
pub fn to_new_contract(
    form: &ContractFormData,
    user_id: &str,
    conversation_id: Option<&str>,
    contract_file: Option<String>,
) -> NewContract {
    let name = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());
    NewContract {
        id: None,
        user_id: user_id.to_string(),
        flat_id: None,
        conversation_id: conversation_id.map(str::to_string),
        landlord_name: name(&form.tenant2_name),
        tenant_name: name(&form.tenant1_name),
        start_date: form.start_date(),
        end_date: form.end_date(),
        monthly_rent: parse_optional_decimal(&form.property2_rent),
        deposit_amount: None,
        platform_fee_percentage: Some(form.platform_fee_percentage.unwrap_or(DEFAULT_PLATFORM_FEE_PERCENTAGE)),
        status: ContractStatus::Pending,
        contract_file,
    }
}

/// Stores a finished contract with status `pending`.
pub async fn save_contract(
    repo: &dyn SwapRepository,
    form: &ContractFormData,
    user_id: &str,
    conversation_id: Option<&str>,
    contract_file: Option<String>,
) -> Result<Contract, RepositoryError> {
    let record = to_new_contract(form, user_id, conversation_id, contract_file);
    match repo.upsert_contract(record).await {
        Ok(contract) => {
            info!(contract_id = %contract.id, user_id, "contract saved");
            Ok(contract)
        }
        Err(e) => {
            error!(error = %e, user_id, "failed to save contract");
            Err(e)
        }
    }
}

#[cfg(test)]
pub(crate) fn complete_form() -> ContractFormData {
    ContractFormData {
        tenant1_name: "Alex Johnson".to_string(),
        tenant1_email: "alex.johnson@email.com".to_string(),
        tenant2_name: "Carlos Gomez".to_string(),
        tenant2_email: "carlos.gomez@email.com".to_string(),
        property1_address: "Friedrichshain, Berlin, Germany".to_string(),
        property1_rent: "1000".to_string(),
        property1_description: "Altbau flat".to_string(),
        property2_address: "Barceloneta, Barcelona, Spain".to_string(),
        property2_rent: "800".to_string(),
        property2_description: "Near the beach".to_string(),
        start_date: "2025-06-01".to_string(),
        end_date: "2025-08-15".to_string(),
        has_read_terms: true,
        ..ContractFormData::default()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::db::MemoryRepository;

    #[tokio::test]
    async fn saved_contract_is_pending_and_summarized() {
        let repo = MemoryRepository::new();

        let contract = save_contract(&repo, &complete_form(), "u1", Some("1"), None).await.unwrap();

        assert_eq!(contract.status, ContractStatus::Pending);
        assert_eq!(contract.monthly_rent, Some(dec!(800)));
        assert_eq!(contract.platform_fee_percentage, Some(dec!(4.5)));

        let summaries = repo.list_contract_summaries("u1").await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].other_party, "Carlos Gomez");
        assert_eq!(summaries[0].conversation_id.as_deref(), Some("1"));
    }

    #[test]
    fn explicit_zero_fee_is_kept() {
        let mut form = complete_form();
        form.platform_fee_percentage = Some(dec!(0));

        let record = to_new_contract(&form, "u1", None, None);

        assert_eq!(record.platform_fee_percentage, Some(dec!(0)));
        assert_eq!(PricingBreakdown::from_form(&form).property1_total, dec!(1000));
    }
}
