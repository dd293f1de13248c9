mod engine;
mod report;
mod tax;
mod types;
mod validation;

pub use engine::{run_calculation, simulate};
pub use report::{build_report, format_grouped, format_inr};
pub use tax::{CESS_RATE_PERCENT, DEFAULT_LTCG_EXEMPTION, DEFAULT_LTCG_RATE_PERCENT, compute_tax};
pub use types::{
    Calculation, CalculationReport, ChartSeries, CompoundingFrequency, InvestmentInput,
    InvestmentMode, InvestmentPlan, LtcgRule, Summary, TaxOutcome, TaxPolicy, YearRow,
    YearlyTrajectory,
};
pub use validation::{ValidationError, ValidationResult, validate};
