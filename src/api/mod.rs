use clap::{Parser, ValueEnum};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tabled::{Table, builder::Builder};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::{
    CalculationReport, CompoundingFrequency, InvestmentInput, InvestmentPlan, LtcgRule, TaxPolicy,
    ValidationError, build_report, format_inr, run_calculation,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to read payload '{path}': {source}")]
    ReadPayload {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Compounding frequency must be 1, 2, 4 or 12 times a year (got {0}).")]
    UnsupportedCompounding(f64),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliMode {
    Sip,
    Lumpsum,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliCompounding {
    Monthly,
    Quarterly,
    HalfYearly,
    Yearly,
}

impl From<CliCompounding> for CompoundingFrequency {
    fn from(value: CliCompounding) -> Self {
        match value {
            CliCompounding::Monthly => CompoundingFrequency::Monthly,
            CliCompounding::Quarterly => CompoundingFrequency::Quarterly,
            CliCompounding::HalfYearly => CompoundingFrequency::HalfYearly,
            CliCompounding::Yearly => CompoundingFrequency::Yearly,
        }
    }
}

impl From<CompoundingFrequency> for CliCompounding {
    fn from(value: CompoundingFrequency) -> Self {
        match value {
            CompoundingFrequency::Monthly => CliCompounding::Monthly,
            CompoundingFrequency::Quarterly => CliCompounding::Quarterly,
            CompoundingFrequency::HalfYearly => CliCompounding::HalfYearly,
            CompoundingFrequency::Yearly => CliCompounding::Yearly,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ApiMode {
    #[serde(alias = "SIP")]
    Sip,
    #[serde(alias = "LUMPSUM", alias = "lumpSum")]
    Lumpsum,
}

impl From<ApiMode> for CliMode {
    fn from(value: ApiMode) -> Self {
        match value {
            ApiMode::Sip => CliMode::Sip,
            ApiMode::Lumpsum => CliMode::Lumpsum,
        }
    }
}

/// Form values supplied as JSON. Every field is optional; present fields
/// override the command-line values. Numeric fields are coerced the way a
/// form would: numeric strings parse, while `null`, `""` and anything else
/// non-numeric become 0.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CalculatePayload {
    mode: Option<ApiMode>,
    #[serde(alias = "monthlyAmount", deserialize_with = "lenient_number")]
    sip_amount: Option<f64>,
    #[serde(alias = "annualStepUpPercent", deserialize_with = "lenient_number")]
    step_up: Option<f64>,
    #[serde(alias = "tenureYears", deserialize_with = "lenient_number")]
    tenure: Option<f64>,
    #[serde(alias = "annualReturnPercent", deserialize_with = "lenient_number")]
    return_rate: Option<f64>,
    #[serde(alias = "annualInflationPercent", deserialize_with = "lenient_number")]
    inflation: Option<f64>,
    #[serde(alias = "principalAmount", deserialize_with = "lenient_number")]
    lumpsum_amount: Option<f64>,
    #[serde(alias = "compFreq", deserialize_with = "lenient_number")]
    compounding_frequency: Option<f64>,
    #[serde(alias = "applyDefaultLTCG", alias = "useDefaultLtcgPolicy")]
    apply_default_ltcg: Option<bool>,
    #[serde(alias = "customExemptionAmount", deserialize_with = "lenient_number")]
    custom_exemption: Option<f64>,
    #[serde(alias = "customTaxRatePercent", deserialize_with = "lenient_number")]
    custom_rate: Option<f64>,
    apply_cess: Option<bool>,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Some(coerce_number(&value)))
}

fn coerce_number(value: &Value) -> f64 {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Bool(true) => Some(1.0),
        _ => None,
    };
    number.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// A coerced 0 means the field was left empty and keeps monthly compounding.
fn compounding_from_payload(raw: f64) -> Result<CompoundingFrequency, ApiError> {
    if raw == 0.0 {
        return Ok(CompoundingFrequency::Monthly);
    }
    let periods = if raw.fract() == 0.0 && (1.0..=12.0).contains(&raw) {
        CompoundingFrequency::from_periods_per_year(raw as u32)
    } else {
        None
    };
    periods.ok_or(ApiError::UnsupportedCompounding(raw))
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "sip-planner",
    version,
    about = "SIP / lumpsum future value projection with inflation and LTCG tax"
)]
pub struct Cli {
    #[arg(long, value_enum, default_value_t = CliMode::Sip)]
    mode: CliMode,
    #[arg(long, default_value_t = 10_000.0, help = "Monthly SIP amount in rupees")]
    sip_amount: f64,
    #[arg(
        long,
        default_value_t = 10.0,
        help = "Annual increase of the SIP amount in percent"
    )]
    step_up: f64,
    #[arg(long, default_value_t = 10.0, help = "Investment tenure in whole years")]
    tenure: f64,
    #[arg(long, default_value_t = 12.0, help = "Expected annual return in percent")]
    return_rate: f64,
    #[arg(long, default_value_t = 6.0, help = "Expected annual inflation in percent")]
    inflation: f64,
    #[arg(long, default_value_t = 100_000.0, help = "One-time investment in rupees")]
    lumpsum_amount: f64,
    #[arg(long, value_enum, default_value_t = CliCompounding::Monthly)]
    compounding: CliCompounding,
    #[arg(long, help = "Use --custom-exemption and --custom-rate instead of the default LTCG rule")]
    custom_ltcg: bool,
    #[arg(long, default_value_t = 125_000.0)]
    custom_exemption: f64,
    #[arg(long, default_value_t = 12.5, help = "Custom LTCG rate in percent")]
    custom_rate: f64,
    #[arg(long, help = "Skip the 4% cess on the computed tax")]
    no_cess: bool,
    #[arg(long, help = "JSON payload overriding the flags above, '-' reads stdin")]
    input: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,
    #[arg(long, default_value = "warn", help = "Log level when RUST_LOG is unset")]
    log_level: String,
}

impl Cli {
    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

/// Runs one calculation for the parsed command line and prints the result.
pub fn run(cli: Cli) -> ExitCode {
    let output = cli.output;
    let result = execute(cli).and_then(|report| render(output, &report));
    match result {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            print_error(output, &err);
            ExitCode::FAILURE
        }
    }
}

/// Validates, simulates and taxes `input`, then shapes the report.
pub fn calculate(input: &InvestmentInput) -> Result<CalculationReport, ValidationError> {
    let calculation = match run_calculation(input) {
        Ok(calculation) => calculation,
        Err(err) => {
            warn!(mode = ?input.mode(), reason = %err, "input rejected");
            return Err(err);
        }
    };

    info!(
        mode = ?input.mode(),
        tenure_years = input.tenure_years,
        final_future_value = calculation.trajectory.final_future_value,
        tax_amount = calculation.tax.tax_amount,
        "calculation complete"
    );
    Ok(build_report(input, &calculation))
}

fn execute(cli: Cli) -> Result<CalculationReport, ApiError> {
    let cli = match cli.input.clone() {
        Some(path) => {
            let payload = read_payload(&path)?;
            apply_payload(cli, payload)?
        }
        None => cli,
    };
    let input = build_input(&cli);
    Ok(calculate(&input)?)
}

fn read_payload(path: &Path) -> Result<CalculatePayload, ApiError> {
    let contents = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|source| ApiError::ReadPayload {
                path: "<stdin>".to_string(),
                source,
            })?;
        buffer
    } else {
        fs::read_to_string(path).map_err(|source| ApiError::ReadPayload {
            path: path.display().to_string(),
            source,
        })?
    };
    debug!(bytes = contents.len(), "payload read");
    Ok(serde_json::from_str(&contents)?)
}

fn apply_payload(mut cli: Cli, payload: CalculatePayload) -> Result<Cli, ApiError> {
    if let Some(v) = payload.mode {
        cli.mode = v.into();
    }
    if let Some(v) = payload.sip_amount {
        cli.sip_amount = v;
    }
    if let Some(v) = payload.step_up {
        cli.step_up = v;
    }
    if let Some(v) = payload.tenure {
        cli.tenure = v;
    }
    if let Some(v) = payload.return_rate {
        cli.return_rate = v;
    }
    if let Some(v) = payload.inflation {
        cli.inflation = v;
    }
    if let Some(v) = payload.lumpsum_amount {
        cli.lumpsum_amount = v;
    }
    if let Some(v) = payload.compounding_frequency {
        cli.compounding = compounding_from_payload(v)?.into();
    }
    if let Some(v) = payload.apply_default_ltcg {
        cli.custom_ltcg = !v;
    }
    if let Some(v) = payload.custom_exemption {
        cli.custom_exemption = v;
    }
    if let Some(v) = payload.custom_rate {
        cli.custom_rate = v;
    }
    if let Some(v) = payload.apply_cess {
        cli.no_cess = !v;
    }
    Ok(cli)
}

fn build_input(cli: &Cli) -> InvestmentInput {
    let plan = match cli.mode {
        CliMode::Sip => InvestmentPlan::Sip {
            monthly_amount: cli.sip_amount,
            annual_step_up_percent: cli.step_up,
        },
        CliMode::Lumpsum => InvestmentPlan::Lumpsum {
            principal_amount: cli.lumpsum_amount,
            compounding: cli.compounding.into(),
        },
    };
    let rule = if cli.custom_ltcg {
        LtcgRule::Custom {
            exemption_amount: cli.custom_exemption,
            tax_rate_percent: cli.custom_rate,
        }
    } else {
        LtcgRule::Default
    };

    InvestmentInput {
        plan,
        tenure_years: tenure_years_from_raw(cli.tenure),
        annual_return_percent: cli.return_rate,
        annual_inflation_percent: cli.inflation,
        tax_policy: TaxPolicy {
            rule,
            apply_cess: !cli.no_cess,
        },
    }
}

/// Whole, in-range tenures convert as-is. Anything else maps to 0 so the
/// tenure rule rejects it after the amount rule has run.
fn tenure_years_from_raw(raw: f64) -> u32 {
    if raw.is_finite() && raw.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&raw) {
        raw as u32
    } else {
        0
    }
}

fn render(format: OutputFormat, report: &CalculationReport) -> Result<String, ApiError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Table => Ok(render_table(report)),
    }
}

fn render_table(report: &CalculationReport) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Year", "Value", "Principal", "Interest", "Real value"]);
    for row in &report.years {
        builder.push_record([
            row.year.to_string(),
            format_inr(row.nominal_value),
            format_inr(row.principal_contributed),
            format_inr(row.interest_accrued),
            format_inr(row.real_value),
        ]);
    }
    let table = Table::from(builder);

    let summary = &report.summary;
    let lines = [
        summary.headline.clone(),
        format!("Future value: {}", format_inr(summary.final_future_value)),
        format!(
            "Inflation adjusted: {}",
            format_inr(summary.inflation_adjusted_value)
        ),
        format!("Total invested: {}", format_inr(summary.total_invested)),
        format!("Total Gain: {}", format_inr(summary.total_gain)),
        format!("Effective CAGR: {:.2}%", summary.effective_cagr_percent),
        summary.tax_line.clone(),
    ];

    format!("{table}\n\n{}", lines.join("\n"))
}

fn print_error(format: OutputFormat, err: &ApiError) {
    let message = err.to_string();
    if format == OutputFormat::Json {
        let body = ErrorResponse {
            error: message.clone(),
        };
        if let Ok(json) = serde_json::to_string_pretty(&body) {
            println!("{json}");
            return;
        }
    }
    eprintln!("error: {message}");
}

#[cfg(test)]
fn cli_from_json(cli: Cli, json: &str) -> Result<Cli, ApiError> {
    let payload = serde_json::from_str::<CalculatePayload>(json)?;
    apply_payload(cli, payload)
}
