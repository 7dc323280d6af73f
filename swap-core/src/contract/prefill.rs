use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::form::ContractFormData;

/// A listing as it appears in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProperty {
    pub id: String,
    pub title: String,
    pub location: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub rent: Option<Decimal>,
    pub description: Option<String>,
}

impl UserProperty {
    /// The listing's description, or a generated one such as
    /// `"2 bedroom, 1 bathroom apartment - Berlin Altbau"`.
    pub fn description_or_summary(&self) -> String {
        match self.description.as_deref().filter(|d| !d.is_empty()) {
            Some(description) => description.to_string(),
            None => format!(
                "{} bedroom, {} bathroom apartment - {}",
                self.bedrooms, self.bathrooms, self.title
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractUser {
    pub name: String,
    pub email: Option<String>,
    pub location: String,
    pub property: Option<UserProperty>,
}

/// Both sides of the conversation a contract is created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationParties {
    pub current_user: ContractUser,
    pub other_user: ContractUser,
}

/// Initial wizard data for a conversation: the current user becomes tenant
/// 1, the other participant tenant 2.
///
/// The other participant's address falls back to their own location when
/// they have no listing.
pub fn prefill_form(parties: &ConversationParties) -> ContractFormData {
    let me = &parties.current_user;
    let them = &parties.other_user;
    let rent = |user: &ContractUser| {
        user.property
            .as_ref()
            .and_then(|p| p.rent)
            .map(|r| r.normalize().to_string())
            .unwrap_or_default()
    };
    let description = |user: &ContractUser| {
        user.property
            .as_ref()
            .map(UserProperty::description_or_summary)
            .unwrap_or_default()
    };

    debug!(tenant1 = %me.name, tenant2 = %them.name, "prefilling contract form");
    ContractFormData {
        tenant1_name: me.name.clone(),
        tenant1_email: me.email.clone().unwrap_or_default(),
        tenant2_name: them.name.clone(),
        tenant2_email: them.email.clone().unwrap_or_default(),
        property1_address: me.property.as_ref().map(|p| p.location.clone()).unwrap_or_default(),
        property1_rent: rent(me),
        property1_description: description(me),
        property2_address: them
            .property
            .as_ref()
            .map(|p| p.location.clone())
            .unwrap_or_else(|| them.location.clone()),
        property2_rent: rent(them),
        property2_description: description(them),
        ..ContractFormData::default()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::forms::StepForm;
    use crate::samples::conversation_parties;

    #[test]
    fn fills_both_tenants_from_the_conversation() {
        let form = prefill_form(&conversation_parties("1"));

        assert_eq!(form.tenant1_name, "Alex Johnson");
        assert_eq!(form.tenant2_email, "carlos.gomez@email.com");
        assert_eq!(form.property1_address, "Friedrichshain, Berlin, Germany");
        assert_eq!(form.property1_rent, "1200");
        assert_eq!(form.property2_rent, "950");
        assert!(form.is_step_valid(1));
        assert!(form.is_step_valid(2));
        assert!(!form.is_step_valid(3));
    }

    #[test]
    fn missing_description_is_generated() {
        let form = prefill_form(&conversation_parties("2"));

        assert_eq!(
            form.property1_description,
            "2 bedroom, 1 bathroom apartment - Berlin Altbau"
        );
        assert_eq!(
            form.property2_description,
            "3 bedroom, 2 bathroom apartment - Historic Villa in Trastevere"
        );
    }

    #[test]
    fn address_falls_back_to_user_location() {
        let mut parties = conversation_parties("1");
        parties.other_user.property = None;

        let form = prefill_form(&parties);

        assert_eq!(form.property2_address, "Barcelona, Spain");
        assert_eq!(form.property2_rent, "");
        assert_eq!(form.property2_description, "");
    }
}
