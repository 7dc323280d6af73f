use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::forms::{FieldPath, FieldValue, FormError, FormFields, StepForm, ValidationErrors};

/// Titles of the contract wizard steps, in order.
pub const STEP_TITLES: [&str; 6] = ["Participants", "Properties", "Timeline", "Pricing", "Terms", "Review"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Everything the contract wizard collects. Tenant 1 is the user creating
/// the contract; tenant 2 is the other party of the conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractFormData {
    pub tenant1_name: String,
    pub tenant1_email: String,
    pub tenant2_name: String,
    pub tenant2_email: String,

    pub property1_address: String,
    pub property1_rent: String,
    pub property1_description: String,
    pub property2_address: String,
    pub property2_rent: String,
    pub property2_description: String,

    /// `YYYY-MM-DD` as entered.
    pub start_date: String,
    pub end_date: String,

    pub special_terms: String,
    /// `None` means the platform default applies.
    pub platform_fee_percentage: Option<Decimal>,
    pub has_read_terms: bool,
    pub has_read_special_terms: bool,
}

impl ContractFormData {
    pub fn start_date(&self) -> Option<NaiveDate> {
        parse_date(&self.start_date)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        parse_date(&self.end_date)
    }

    pub fn has_special_terms(&self) -> bool {
        !self.special_terms.trim().is_empty()
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

impl FormFields for ContractFormData {
    fn set_field(
        &mut self,
        path: &FieldPath<'_>,
        value: FieldValue,
    ) -> Result<(), FormError> {
        let slot = match path.as_str() {
            "tenant1_name" => &mut self.tenant1_name,
            "tenant1_email" => &mut self.tenant1_email,
            "tenant2_name" => &mut self.tenant2_name,
            "tenant2_email" => &mut self.tenant2_email,
            "property1_address" => &mut self.property1_address,
            "property1_rent" => &mut self.property1_rent,
            "property1_description" => &mut self.property1_description,
            "property2_address" => &mut self.property2_address,
            "property2_rent" => &mut self.property2_rent,
            "property2_description" => &mut self.property2_description,
            "start_date" => &mut self.start_date,
            "end_date" => &mut self.end_date,
            "special_terms" => &mut self.special_terms,
            "platform_fee_percentage" => {
                self.platform_fee_percentage = value.into_optional_number(path)?;
                return Ok(());
            }
            "has_read_terms" => {
                self.has_read_terms = value.into_flag(path)?;
                return Ok(());
            }
            "has_read_special_terms" => {
                self.has_read_special_terms = value.into_flag(path)?;
                return Ok(());
            }
            _ => return Err(path.unknown()),
        };
        *slot = value.into_text(path)?;
        Ok(())
    }
}

fn require(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    message: &str,
) {
    if value.trim().is_empty() {
        errors.insert(field, message);
    }
}

/// Field errors that keep `step` from being valid. Step 6 reports the
/// errors of every earlier step.
pub fn step_errors(
    form: &ContractFormData,
    step: usize,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    match step {
        1 => {
            require(&mut errors, "tenant1_name", &form.tenant1_name, "Your name is required");
            require(&mut errors, "tenant1_email", &form.tenant1_email, "Your email is required");
            require(&mut errors, "tenant2_name", &form.tenant2_name, "Other tenant's name is required");
            require(&mut errors, "tenant2_email", &form.tenant2_email, "Other tenant's email is required");
        }
        2 => {
            require(&mut errors, "property1_address", &form.property1_address, "Property address is required");
            require(&mut errors, "property1_rent", &form.property1_rent, "Monthly rent is required");
            require(
                &mut errors,
                "property1_description",
                &form.property1_description,
                "Property description is required",
            );
            require(&mut errors, "property2_address", &form.property2_address, "Property address is required");
            require(&mut errors, "property2_rent", &form.property2_rent, "Monthly rent is required");
            require(
                &mut errors,
                "property2_description",
                &form.property2_description,
                "Property description is required",
            );
        }
        3 => {
            require(&mut errors, "start_date", &form.start_date, "Start date is required");
            require(&mut errors, "end_date", &form.end_date, "End date is required");
            if !errors.is_empty() {
                return errors;
            }
            match (form.start_date(), form.end_date()) {
                (Some(start), Some(end)) if start >= end => {
                    errors.insert("end_date", "End date must be after start date");
                }
                (None, _) => errors.insert("start_date", "Please enter a valid date"),
                (_, None) => errors.insert("end_date", "Please enter a valid date"),
                _ => {}
            }
        }
        4 => {
            require(&mut errors, "property1_rent", &form.property1_rent, "Monthly rent is required");
            require(&mut errors, "property2_rent", &form.property2_rent, "Monthly rent is required");
        }
        5 => {
            if !form.has_read_terms {
                errors.insert("has_read_terms", "Please confirm you have read the terms and conditions");
            }
            if form.has_special_terms() && !form.has_read_special_terms {
                errors.insert("has_read_special_terms", "Please confirm you have read the special terms");
            }
        }
        6 => {
            for earlier in 1..6 {
                errors.merge(step_errors(form, earlier));
            }
        }
        _ => errors.insert(crate::forms::GENERAL_FIELD, "Unknown step"),
    }
    errors
}

impl StepForm for ContractFormData {
    const STEP_COUNT: usize = STEP_TITLES.len();

    fn is_step_valid(
        &self,
        step: usize,
    ) -> bool {
        step_errors(self, step).is_empty()
    }
}
