use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentMode {
    Sip,
    Lumpsum,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum CompoundingFrequency {
    #[default]
    Monthly,
    Quarterly,
    HalfYearly,
    Yearly,
}

impl CompoundingFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            CompoundingFrequency::Monthly => 12,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::HalfYearly => 2,
            CompoundingFrequency::Yearly => 1,
        }
    }

    pub fn from_periods_per_year(periods: u32) -> Option<Self> {
        match periods {
            12 => Some(CompoundingFrequency::Monthly),
            4 => Some(CompoundingFrequency::Quarterly),
            2 => Some(CompoundingFrequency::HalfYearly),
            1 => Some(CompoundingFrequency::Yearly),
            _ => None,
        }
    }

    /// Number of months between two compounding events.
    pub fn months_per_period(self) -> u32 {
        12 / self.periods_per_year()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InvestmentPlan {
    Sip {
        monthly_amount: f64,
        annual_step_up_percent: f64,
    },
    Lumpsum {
        principal_amount: f64,
        compounding: CompoundingFrequency,
    },
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LtcgRule {
    /// 125,000 exemption taxed at 12.5%.
    Default,
    Custom {
        exemption_amount: f64,
        tax_rate_percent: f64,
    },
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TaxPolicy {
    pub rule: LtcgRule,
    pub apply_cess: bool,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InvestmentInput {
    pub plan: InvestmentPlan,
    pub tenure_years: u32,
    pub annual_return_percent: f64,
    pub annual_inflation_percent: f64,
    pub tax_policy: TaxPolicy,
}

impl InvestmentInput {
    pub fn mode(&self) -> InvestmentMode {
        match self.plan {
            InvestmentPlan::Sip { .. } => InvestmentMode::Sip,
            InvestmentPlan::Lumpsum { .. } => InvestmentMode::Lumpsum,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyTrajectory {
    pub year_end_nominal_value: Vec<f64>,
    pub year_end_real_value: Vec<f64>,
    pub principal_contributed_this_year: Vec<f64>,
    pub interest_accrued_this_year: Vec<f64>,
    pub total_principal_invested: f64,
    pub final_future_value: f64,
}

impl YearlyTrajectory {
    pub fn years(&self) -> usize {
        self.year_end_nominal_value.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxOutcome {
    pub gain: f64,
    pub exemption_threshold: f64,
    pub tax_rate_percent: f64,
    pub cess_rate_percent: f64,
    pub taxable_gain: f64,
    pub tax_amount: f64,
    pub post_tax_future_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub trajectory: YearlyTrajectory,
    pub tax: TaxOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRow {
    pub year: u32,
    pub nominal_value: f64,
    pub principal_contributed: f64,
    pub interest_accrued: f64,
    pub real_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub nominal: Vec<f64>,
    pub real: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub final_future_value: f64,
    pub inflation_adjusted_value: f64,
    pub total_invested: f64,
    pub total_gain: f64,
    pub effective_cagr_percent: f64,
    pub headline: String,
    pub tax_line: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationReport {
    pub mode: InvestmentMode,
    pub tenure_years: u32,
    pub annual_return_percent: f64,
    pub annual_inflation_percent: f64,
    pub summary: Summary,
    pub tax: TaxOutcome,
    pub years: Vec<YearRow>,
    pub chart: ChartSeries,
}
