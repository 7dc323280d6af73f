use std::fmt;

use super::duration::describe_duration;
use super::form::ContractFormData;
use super::pricing::PricingBreakdown;
use crate::common::format_euros;

const DISPLAY_DATE: &str = "%d/%m/%Y";

/// What the review step shows before the contract is exported.
#[derive(Debug, Clone)]
pub struct ContractReview<'a> {
    form: &'a ContractFormData,
    pricing: PricingBreakdown,
    duration: Option<String>,
}

impl<'a> ContractReview<'a> {
    pub fn new(form: &'a ContractFormData) -> Self {
        let duration = match (form.start_date(), form.end_date()) {
            (Some(start), Some(end)) => Some(describe_duration(start, end)),
            _ => None,
        };
        Self {
            form,
            pricing: PricingBreakdown::from_form(form),
            duration,
        }
    }

    pub fn pricing(&self) -> &PricingBreakdown {
        &self.pricing
    }

    pub fn duration(&self) -> Option<&str> {
        self.duration.as_deref()
    }
}

fn display_date(raw: &str) -> String {
    chrono::NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(|d| d.format(DISPLAY_DATE).to_string())
        .unwrap_or_else(|_| raw.to_string())
}

impl fmt::Display for ContractReview<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let form = self.form;
        let p = &self.pricing;

        writeln!(f, "Participants")?;
        writeln!(f, "  Tenant A: {} <{}>", form.tenant1_name, form.tenant1_email)?;
        writeln!(f, "  Tenant B: {} <{}>", form.tenant2_name, form.tenant2_email)?;
        writeln!(f)?;

        writeln!(f, "Properties")?;
        for (owner, address, description, rent) in [
            (&form.tenant1_name, &form.property1_address, &form.property1_description, &form.property1_rent),
            (&form.tenant2_name, &form.property2_address, &form.property2_description, &form.property2_rent),
        ] {
            writeln!(f, "  {owner}'s Property")?;
            writeln!(f, "    {address}")?;
            writeln!(f, "    {description}")?;
            writeln!(f, "    Base Rent: €{}/month", rent.trim())?;
        }
        writeln!(f)?;

        writeln!(f, "Timeline")?;
        writeln!(f, "  Start Date: {}", display_date(&form.start_date))?;
        writeln!(f, "  End Date: {}", display_date(&form.end_date))?;
        if let Some(duration) = &self.duration {
            writeln!(f, "  Duration: {duration}")?;
        }

        if form.has_special_terms() {
            writeln!(f)?;
            writeln!(f, "Special Terms")?;
            writeln!(f, "  {}", form.special_terms.trim())?;
        }
        writeln!(f)?;

        writeln!(f, "Pricing Summary")?;
        // Each tenant pays for the other tenant's property.
        for (payer, rent, fee, total) in [
            (&form.tenant1_name, p.property2_rent, p.property2_platform_fee, p.property2_total),
            (&form.tenant2_name, p.property1_rent, p.property1_platform_fee, p.property1_total),
        ] {
            writeln!(f, "  {payer} pays monthly:")?;
            writeln!(f, "    Rent: {}", format_euros(rent))?;
            writeln!(f, "    Platform Fee ({}%): {}", p.fee_percentage.normalize(), format_euros(fee))?;
            writeln!(f, "    Total: {}", format_euros(total))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::contract::complete_form;

    #[test]
    fn summary_lists_pricing_per_payer() {
        let form = complete_form();
        let text = ContractReview::new(&form).to_string();

        assert!(text.contains("  Alex Johnson pays monthly:\n    Rent: €800.00\n    Platform Fee (4.5%): €36.00\n    Total: €836.00"));
        assert!(text.contains("  Carlos Gomez pays monthly:\n    Rent: €1000.00\n    Platform Fee (4.5%): €45.00\n    Total: €1045.00"));
        assert!(text.contains("Start Date: 01/06/2025"));
        assert!(!text.contains("Special Terms"));
    }

    #[test]
    fn duration_needs_both_dates() {
        let mut form = complete_form();
        assert_eq!(ContractReview::new(&form).duration(), Some("2 months and 15 days"));

        form.end_date.clear();
        assert_eq!(ContractReview::new(&form).duration(), None);
    }

    #[test]
    fn special_terms_are_shown_when_present() {
        let mut form = complete_form();
        form.special_terms = "Water the plants weekly".to_string();

        let text = ContractReview::new(&form).to_string();

        assert!(text.contains("Special Terms\n  Water the plants weekly\n"));
    }
}
