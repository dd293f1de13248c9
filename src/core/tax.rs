use super::types::{LtcgRule, TaxOutcome, TaxPolicy};

pub const DEFAULT_LTCG_EXEMPTION: f64 = 125_000.0;
pub const DEFAULT_LTCG_RATE_PERCENT: f64 = 12.5;
pub const CESS_RATE_PERCENT: f64 = 4.0;

/// Flat-rate LTCG on the nominal gain. Cess is a surcharge on the tax, not on
/// the gain. Custom exemption and rate are used verbatim.
pub fn compute_tax(
    final_future_value: f64,
    total_principal_invested: f64,
    policy: &TaxPolicy,
) -> TaxOutcome {
    let gain = (final_future_value - total_principal_invested).max(0.0);
    let (exemption_threshold, tax_rate_percent) = match policy.rule {
        LtcgRule::Default => (DEFAULT_LTCG_EXEMPTION, DEFAULT_LTCG_RATE_PERCENT),
        LtcgRule::Custom {
            exemption_amount,
            tax_rate_percent,
        } => (exemption_amount, tax_rate_percent),
    };
    let cess_rate_percent = if policy.apply_cess {
        CESS_RATE_PERCENT
    } else {
        0.0
    };

    let taxable_gain = (gain - exemption_threshold).max(0.0);
    let mut tax_amount = taxable_gain * (tax_rate_percent / 100.0);
    tax_amount += tax_amount * (cess_rate_percent / 100.0);

    TaxOutcome {
        gain,
        exemption_threshold,
        tax_rate_percent,
        cess_rate_percent,
        taxable_gain,
        tax_amount,
        post_tax_future_value: final_future_value - tax_amount,
    }
}
