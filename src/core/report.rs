use super::types::{
    Calculation, CalculationReport, ChartSeries, InvestmentInput, InvestmentMode, Summary, YearRow,
};

/// Shapes a calculation into the record handed to renderers. Values stay
/// unrounded except the chart series, which are display-only.
pub fn build_report(input: &InvestmentInput, calculation: &Calculation) -> CalculationReport {
    let trajectory = &calculation.trajectory;
    let tax = calculation.tax;
    let tenure = input.tenure_years as f64;

    let inflation_adjusted_value = trajectory.final_future_value
        / (1.0 + input.annual_inflation_percent / 100.0).powf(tenure);
    let effective_cagr_percent = if trajectory.total_principal_invested > 0.0 {
        ((trajectory.final_future_value / trajectory.total_principal_invested).powf(1.0 / tenure)
            - 1.0)
            * 100.0
    } else {
        0.0
    };

    let mode_label = match input.mode() {
        InvestmentMode::Sip => "SIP",
        InvestmentMode::Lumpsum => "Lumpsum",
    };
    let headline = format!(
        "{mode_label} · {} yrs · {}% p.a. · Infl {}%",
        input.tenure_years, input.annual_return_percent, input.annual_inflation_percent
    );
    let tax_line = format!(
        "LTCG: taxable ₹{}, tax ₹{}, post-tax {}",
        format_grouped(tax.taxable_gain),
        format_grouped(tax.tax_amount),
        format_inr(tax.post_tax_future_value)
    );

    let years = (0..trajectory.years())
        .map(|idx| YearRow {
            year: idx as u32 + 1,
            nominal_value: trajectory.year_end_nominal_value[idx],
            principal_contributed: trajectory.principal_contributed_this_year[idx],
            interest_accrued: trajectory.interest_accrued_this_year[idx],
            real_value: trajectory.year_end_real_value[idx],
        })
        .collect::<Vec<_>>();

    let chart = ChartSeries {
        labels: years.iter().map(|row| row.year.to_string()).collect(),
        nominal: trajectory
            .year_end_nominal_value
            .iter()
            .map(|v| v.round())
            .collect(),
        real: trajectory
            .year_end_real_value
            .iter()
            .map(|v| v.round())
            .collect(),
    };

    CalculationReport {
        mode: input.mode(),
        tenure_years: input.tenure_years,
        annual_return_percent: input.annual_return_percent,
        annual_inflation_percent: input.annual_inflation_percent,
        summary: Summary {
            final_future_value: trajectory.final_future_value,
            inflation_adjusted_value,
            total_invested: trajectory.total_principal_invested,
            total_gain: tax.gain,
            effective_cagr_percent,
            headline,
            tax_line,
        },
        tax,
        years,
        chart,
    }
}

/// Whole-rupee amount with the rupee sign, e.g. `₹2,90,250`.
pub fn format_inr(value: f64) -> String {
    let grouped = format_grouped(value);
    match grouped.strip_prefix('-') {
        Some(digits) => format!("-₹{digits}"),
        None => format!("₹{grouped}"),
    }
}

/// Rounds to whole units and groups digits the Indian way: the last three
/// digits, then pairs (`1,00,00,000`). Non-finite values render as `0`.
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let grouped = group_indian(&digits);
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::with_capacity(head.len() / 2 + 2);
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{last_three}", groups.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::run_calculation;
    use crate::core::types::{CompoundingFrequency, InvestmentPlan, LtcgRule, TaxPolicy};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_input() -> InvestmentInput {
        InvestmentInput {
            plan: InvestmentPlan::Sip {
                monthly_amount: 10_000.0,
                annual_step_up_percent: 10.0,
            },
            tenure_years: 10,
            annual_return_percent: 12.0,
            annual_inflation_percent: 6.0,
            tax_policy: TaxPolicy {
                rule: LtcgRule::Default,
                apply_cess: true,
            },
        }
    }

    #[test]
    fn indian_grouping() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(1_000.0), "1,000");
        assert_eq!(format_grouped(75_000.0), "75,000");
        assert_eq!(format_grouped(290_250.0), "2,90,250");
        assert_eq!(format_grouped(12_345_678.0), "1,23,45,678");
        assert_eq!(format_grouped(1_000_000_000.0), "1,00,00,00,000");
    }

    #[test]
    fn inr_rounds_to_whole_rupees() {
        assert_eq!(format_inr(126_825.03), "₹1,26,825");
        assert_eq!(format_inr(112_682.5), "₹1,12,683");
        assert_eq!(format_inr(0.4), "₹0");
        assert_eq!(format_inr(-1_234.0), "-₹1,234");
        assert_eq!(format_inr(f64::NAN), "₹0");
    }

    #[test]
    fn report_rows_mirror_trajectory() {
        let input = sample_input();
        let calculation = run_calculation(&input).expect("valid input");
        let report = build_report(&input, &calculation);
        let trajectory = &calculation.trajectory;

        assert_eq!(report.mode, InvestmentMode::Sip);
        assert_eq!(report.years.len(), 10);
        assert_eq!(report.chart.labels.len(), 10);
        assert_eq!(report.chart.labels[0], "1");
        assert_eq!(report.chart.labels[9], "10");
        for (idx, row) in report.years.iter().enumerate() {
            assert_eq!(row.year, idx as u32 + 1);
            assert_eq!(row.nominal_value, trajectory.year_end_nominal_value[idx]);
            assert_eq!(row.real_value, trajectory.year_end_real_value[idx]);
            assert_eq!(
                row.principal_contributed,
                trajectory.principal_contributed_this_year[idx]
            );
            assert_eq!(row.interest_accrued, trajectory.interest_accrued_this_year[idx]);
            assert_eq!(report.chart.nominal[idx], row.nominal_value.round());
            assert_eq!(report.chart.real[idx], row.real_value.round());
        }
        assert_eq!(report.summary.final_future_value, trajectory.final_future_value);
        assert_eq!(report.summary.total_gain, calculation.tax.gain);
    }

    #[test]
    fn summary_inflation_adjustment_and_cagr() {
        let input = InvestmentInput {
            plan: InvestmentPlan::Lumpsum {
                principal_amount: 100_000.0,
                compounding: CompoundingFrequency::Yearly,
            },
            tenure_years: 2,
            annual_return_percent: 10.0,
            annual_inflation_percent: 10.0,
            ..sample_input()
        };
        let calculation = run_calculation(&input).expect("valid input");
        let report = build_report(&input, &calculation);

        assert_approx(report.summary.final_future_value, 121_000.0);
        assert_approx(report.summary.inflation_adjusted_value, 100_000.0);
        assert_approx(report.summary.effective_cagr_percent, 10.0);
        assert_eq!(report.summary.headline, "Lumpsum · 2 yrs · 10% p.a. · Infl 10%");
    }

    #[test]
    fn zero_investment_reports_zero_cagr() {
        let input = InvestmentInput {
            plan: InvestmentPlan::Sip {
                monthly_amount: 0.0,
                annual_step_up_percent: 0.0,
            },
            ..sample_input()
        };
        let calculation = run_calculation(&input).expect("valid input");
        let report = build_report(&input, &calculation);
        assert_approx(report.summary.effective_cagr_percent, 0.0);
        assert_eq!(
            report.summary.tax_line,
            "LTCG: taxable ₹0, tax ₹0, post-tax ₹0"
        );
    }

    #[test]
    fn tax_line_uses_indian_grouping() {
        let input = sample_input();
        let mut calculation = run_calculation(&input).expect("valid input");
        calculation.tax = crate::core::tax::compute_tax(
            300_000.0,
            100_000.0,
            &TaxPolicy {
                rule: LtcgRule::Default,
                apply_cess: true,
            },
        );
        let report = build_report(&input, &calculation);
        assert_eq!(
            report.summary.tax_line,
            "LTCG: taxable ₹75,000, tax ₹9,750, post-tax ₹2,90,250"
        );
        assert_eq!(report.summary.headline, "SIP · 10 yrs · 12% p.a. · Infl 6%");
    }

    #[test]
    fn report_serializes_camel_case_fields() {
        let input = sample_input();
        let calculation = run_calculation(&input).expect("valid input");
        let report = build_report(&input, &calculation);
        let json = serde_json::to_string(&report).expect("report should serialize");

        assert!(json.contains("\"mode\":\"sip\""));
        assert!(json.contains("\"inflationAdjustedValue\""));
        assert!(json.contains("\"effectiveCagrPercent\""));
        assert!(json.contains("\"postTaxFutureValue\""));
        assert!(json.contains("\"principalContributed\""));
        assert!(json.contains("\"interestAccrued\""));
        assert!(json.contains("\"labels\""));
    }
}
