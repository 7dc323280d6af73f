//! Monthly cost breakdown shown on the pricing and review steps.
//!
//! Each tenant pays the other tenant's rent plus a platform fee:
//!
//! | Value        | Formula                          |
//! |--------------|----------------------------------|
//! | platform fee | rent × fee percentage ÷ 100      |
//! | total        | rent + platform fee              |
//!
//! Rents come from free-text form fields; text that is empty or not a
//! number counts as zero. Amounts are kept unrounded and only rounded to
//! two places when formatted.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use swap_core::contract::calculate_pricing;
//!
//! let pricing = calculate_pricing(dec!(1000), dec!(800), dec!(4.5));
//!
//! assert_eq!(pricing.property1_total, dec!(1045.0));
//! assert_eq!(pricing.property2_total, dec!(836.0));
//! ```

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::form::ContractFormData;
use crate::common::parse_decimal_or_zero;

/// Fee charged when the form does not set one: 4.5%.
pub const DEFAULT_PLATFORM_FEE_PERCENTAGE: Decimal = Decimal::from_parts(45, 0, 0, false, 1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PricingBreakdown {
    pub fee_percentage: Decimal,

    pub property1_rent: Decimal,
    pub property1_platform_fee: Decimal,
    pub property1_total: Decimal,

    pub property2_rent: Decimal,
    pub property2_platform_fee: Decimal,
    pub property2_total: Decimal,
}

/// Platform fee on `rent` at `fee_percentage` percent.
pub fn platform_fee(
    rent: Decimal,
    fee_percentage: Decimal,
) -> Decimal {
    rent * fee_percentage / Decimal::ONE_HUNDRED
}

/// Computes the breakdown for two rents.
///
/// No input is rejected: negative rents or percentages pass straight
/// through the formulas.
pub fn calculate_pricing(
    property1_rent: Decimal,
    property2_rent: Decimal,
    fee_percentage: Decimal,
) -> PricingBreakdown {
    let property1_platform_fee = platform_fee(property1_rent, fee_percentage);
    let property2_platform_fee = platform_fee(property2_rent, fee_percentage);
    PricingBreakdown {
        fee_percentage,
        property1_rent,
        property1_platform_fee,
        property1_total: property1_rent + property1_platform_fee,
        property2_rent,
        property2_platform_fee,
        property2_total: property2_rent + property2_platform_fee,
    }
}

impl PricingBreakdown {
    /// Breakdown for the rents and fee currently in the form.
    pub fn from_form(form: &ContractFormData) -> Self {
        let fee = form.platform_fee_percentage.unwrap_or(DEFAULT_PLATFORM_FEE_PERCENTAGE);
        let pricing = calculate_pricing(
            parse_decimal_or_zero(&form.property1_rent),
            parse_decimal_or_zero(&form.property2_rent),
            fee,
        );
        debug!(
            fee = %fee,
            property1_total = %pricing.property1_total,
            property2_total = %pricing.property2_total,
            "pricing calculated"
        );
        pricing
    }
}
