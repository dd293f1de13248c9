use tracing::{debug, trace};

use super::tax::compute_tax;
use super::types::{
    Calculation, CompoundingFrequency, InvestmentInput, InvestmentPlan, YearlyTrajectory,
};
use super::validation::{ValidationError, validate};

const MONTHS_PER_YEAR: u32 = 12;

/// Validates `input`, then simulates it and taxes the final value. Nothing is
/// simulated when validation fails.
pub fn run_calculation(input: &InvestmentInput) -> Result<Calculation, ValidationError> {
    validate(input)?;
    let trajectory = simulate(input);
    let tax = compute_tax(
        trajectory.final_future_value,
        trajectory.total_principal_invested,
        &input.tax_policy,
    );
    Ok(Calculation { trajectory, tax })
}

/// Year-by-year projection for an already validated input.
pub fn simulate(input: &InvestmentInput) -> YearlyTrajectory {
    let trajectory = match input.plan {
        InvestmentPlan::Sip {
            monthly_amount,
            annual_step_up_percent,
        } => simulate_sip(input, monthly_amount, annual_step_up_percent),
        InvestmentPlan::Lumpsum {
            principal_amount,
            compounding,
        } => simulate_lumpsum(input, principal_amount, compounding),
    };

    debug!(
        mode = ?input.mode(),
        years = trajectory.years(),
        final_future_value = trajectory.final_future_value,
        total_principal_invested = trajectory.total_principal_invested,
        "simulation finished"
    );
    trajectory
}

struct TrajectoryBuilder {
    inflation_factor: f64,
    nominal: Vec<f64>,
    real: Vec<f64>,
    principal: Vec<f64>,
    interest: Vec<f64>,
}

impl TrajectoryBuilder {
    fn new(tenure_years: u32, annual_inflation_percent: f64) -> Self {
        let years = tenure_years as usize;
        Self {
            inflation_factor: 1.0 + annual_inflation_percent / 100.0,
            nominal: Vec::with_capacity(years),
            real: Vec::with_capacity(years),
            principal: Vec::with_capacity(years),
            interest: Vec::with_capacity(years),
        }
    }

    fn close_year(&mut self, year: u32, future_value: f64, principal: f64, interest: f64) {
        let deflator = self.inflation_factor.powi(year as i32);
        let real_value = future_value / deflator;
        trace!(year, future_value, real_value, principal, interest, "year closed");

        self.nominal.push(future_value);
        self.real.push(real_value);
        self.principal.push(principal);
        self.interest.push(interest);
    }

    fn finish(self, total_principal_invested: f64, final_future_value: f64) -> YearlyTrajectory {
        YearlyTrajectory {
            year_end_nominal_value: self.nominal,
            year_end_real_value: self.real,
            principal_contributed_this_year: self.principal,
            interest_accrued_this_year: self.interest,
            total_principal_invested,
            final_future_value,
        }
    }
}

fn monthly_rate(annual_return_percent: f64) -> f64 {
    annual_return_percent / 100.0 / MONTHS_PER_YEAR as f64
}

fn simulate_sip(
    input: &InvestmentInput,
    monthly_amount: f64,
    annual_step_up_percent: f64,
) -> YearlyTrajectory {
    let months = input.tenure_years * MONTHS_PER_YEAR;
    let rate = monthly_rate(input.annual_return_percent);
    let step_up_factor = 1.0 + annual_step_up_percent / 100.0;
    let mut builder = TrajectoryBuilder::new(input.tenure_years, input.annual_inflation_percent);

    let mut future_value = 0.0;
    let mut current_amount = monthly_amount;
    let mut invested = 0.0;
    let mut principal_this_year = 0.0;
    let mut interest_this_year = 0.0;

    for month in 1..=months {
        // Interest accrues on the prior balance; this month's contribution earns nothing yet.
        let interest_this_month = future_value * rate;
        future_value = future_value * (1.0 + rate) + current_amount;
        invested += current_amount;
        principal_this_year += current_amount;
        interest_this_year += interest_this_month;

        if month % MONTHS_PER_YEAR == 0 {
            builder.close_year(
                month / MONTHS_PER_YEAR,
                future_value,
                principal_this_year,
                interest_this_year,
            );
            principal_this_year = 0.0;
            interest_this_year = 0.0;
            current_amount *= step_up_factor;
        }
    }

    builder.finish(invested, future_value)
}

fn simulate_lumpsum(
    input: &InvestmentInput,
    principal_amount: f64,
    compounding: CompoundingFrequency,
) -> YearlyTrajectory {
    let months = input.tenure_years * MONTHS_PER_YEAR;
    let months_per_period = compounding.months_per_period();
    let period_rate =
        input.annual_return_percent / 100.0 / compounding.periods_per_year() as f64;
    let mut builder = TrajectoryBuilder::new(input.tenure_years, input.annual_inflation_percent);

    let mut future_value = principal_amount;
    let mut interest_this_year = 0.0;

    for month in 1..=months {
        if month % months_per_period == 0 {
            let interest_this_period = future_value * period_rate;
            future_value *= 1.0 + period_rate;
            interest_this_year += interest_this_period;
        }

        if month % MONTHS_PER_YEAR == 0 {
            let year = month / MONTHS_PER_YEAR;
            let principal_this_year = if year == 1 { principal_amount } else { 0.0 };
            builder.close_year(year, future_value, principal_this_year, interest_this_year);
            interest_this_year = 0.0;
        }
    }

    builder.finish(principal_amount, future_value)
}
