use thiserror::Error;

use super::types::{InvestmentInput, InvestmentPlan};

pub const MAX_MONTHLY_SIP: f64 = 500_000.0;
pub const MAX_LUMPSUM: f64 = 1_000_000_000.0;
pub const MIN_TENURE_YEARS: u32 = 1;
pub const MAX_TENURE_YEARS: u32 = 35;
pub const MAX_RETURN_PERCENT: f64 = 20.0;
pub const MAX_INFLATION_PERCENT: f64 = 10.0;

/// Reason an input was rejected. The `Display` text is shown to the user as-is.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum ValidationError {
    #[error("Monthly SIP must be between ₹0 and ₹5,00,000.")]
    SipAmountOutOfRange,
    #[error("Lumpsum must be between ₹0 and ₹10,00,00,000.")]
    LumpsumAmountOutOfRange,
    #[error("Tenure must be between 1 and 35 years.")]
    TenureOutOfRange,
    #[error("Return must be between 0% and 20% p.a.")]
    ReturnOutOfRange,
    #[error("Inflation must be between 0% and 10% p.a.")]
    InflationOutOfRange,
}

pub type ValidationResult = Result<(), ValidationError>;

/// Checks the active plan's amount, then tenure, return and inflation. The
/// first failing rule is reported. Tax-policy fields pass through unchecked.
pub fn validate(input: &InvestmentInput) -> ValidationResult {
    match input.plan {
        InvestmentPlan::Sip { monthly_amount, .. } => {
            if !(0.0..=MAX_MONTHLY_SIP).contains(&monthly_amount) {
                return Err(ValidationError::SipAmountOutOfRange);
            }
        }
        InvestmentPlan::Lumpsum {
            principal_amount, ..
        } => {
            if !(0.0..=MAX_LUMPSUM).contains(&principal_amount) {
                return Err(ValidationError::LumpsumAmountOutOfRange);
            }
        }
    }

    if !(MIN_TENURE_YEARS..=MAX_TENURE_YEARS).contains(&input.tenure_years) {
        return Err(ValidationError::TenureOutOfRange);
    }

    if !(0.0..=MAX_RETURN_PERCENT).contains(&input.annual_return_percent) {
        return Err(ValidationError::ReturnOutOfRange);
    }

    if !(0.0..=MAX_INFLATION_PERCENT).contains(&input.annual_inflation_percent) {
        return Err(ValidationError::InflationOutOfRange);
    }

    Ok(())
}
