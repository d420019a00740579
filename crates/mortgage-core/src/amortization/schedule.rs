use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::payment::effective_monthly_payment;
use crate::types::*;

/// Relative tolerance for treating the closing balance as fully repaid.
const PAYOFF_TOLERANCE: f64 = 1e-6;

/// One period of an amortization schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub period: u32,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub remaining_balance: Money,
}

/// Input for a full amortization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub principal: Money,
    pub annual_rate_percent: RatePercent,
    pub term_years: u32,
    /// Fixed payment to apply; computed from the other inputs when absent or <= 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_payment: Option<Money>,
}

/// Output of a full amortization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub monthly_payment: Money,
    pub schedule: Vec<ScheduleEntry>,
    pub total_interest: Money,
    pub total_principal: Money,
    pub total_paid: Money,
}

/// JavaScript-style truthiness: zero and NaN both mean "not set yet".
fn is_unset(value: f64) -> bool {
    value == 0.0 || value.is_nan()
}

/// Period-by-period breakdown of a fixed-payment loan.
///
/// Returns an empty schedule when any input is zero: callers pass placeholder
/// zeros before the user has filled the form, and a zero-rate schedule is
/// suppressed along with them. Otherwise the schedule always has
/// `term_years * 12` entries, even when the balance reaches zero early.
/// A term whose period count does not fit in a `u32` also yields an empty
/// schedule.
pub fn generate_schedule(
    principal: Money,
    annual_rate_percent: RatePercent,
    term_years: u32,
    monthly_payment: Money,
) -> Vec<ScheduleEntry> {
    if is_unset(principal)
        || is_unset(annual_rate_percent)
        || term_years == 0
        || is_unset(monthly_payment)
    {
        return Vec::new();
    }

    let params = LoanParameters::new(principal, annual_rate_percent, term_years);
    let Some(periods) = params.checked_total_payments() else {
        return Vec::new();
    };
    let monthly_rate = params.monthly_rate();
    let mut balance = principal;

    (1..=periods)
        .map(|period| {
            let interest_portion = balance * monthly_rate;
            let principal_portion = monthly_payment - interest_portion;
            balance -= principal_portion;
            if balance < 0.0 {
                balance = 0.0;
            }
            ScheduleEntry {
                period,
                interest_portion,
                principal_portion,
                remaining_balance: balance,
            }
        })
        .collect()
}

/// Build the payment and schedule, with totals, for one loan.
pub fn build_amortization(input: &AmortizationInput) -> ComputationOutput<AmortizationOutput> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let params = LoanParameters::new(input.principal, input.annual_rate_percent, input.term_years);
    let monthly_payment = effective_monthly_payment(&params, input.monthly_payment);
    let schedule = generate_schedule(
        input.principal,
        input.annual_rate_percent,
        input.term_years,
        monthly_payment,
    );

    if params.checked_total_payments().is_none() {
        warnings.push(format!(
            "Schedule suppressed: a {}-year term exceeds {} monthly periods",
            input.term_years,
            u32::MAX
        ));
    } else if schedule.is_empty() {
        warnings.push(
            "Schedule suppressed: principal, rate, term and payment must all be non-zero".into(),
        );
    } else if let Some(last) = schedule.last() {
        if last.remaining_balance > PAYOFF_TOLERANCE * input.principal.abs().max(1.0) {
            warnings.push(format!(
                "Payment of {monthly_payment:.2} does not amortize the loan; {:.2} remains after period {}",
                last.remaining_balance, last.period
            ));
        }
    }

    let total_interest: Money = schedule.iter().map(|e| e.interest_portion).sum();
    let total_principal: Money = schedule.iter().map(|e| e.principal_portion).sum();

    let output = AmortizationOutput {
        monthly_payment,
        total_interest,
        total_principal,
        total_paid: total_interest + total_principal,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Fixed-rate amortization schedule",
        &serde_json::json!({
            "principal": input.principal,
            "annual_rate_percent": input.annual_rate_percent,
            "term_years": input.term_years,
            "monthly_rate": params.monthly_rate(),
            "payment_overridden": input.monthly_payment.is_some_and(|p| p > 0.0),
        }),
        warnings,
        elapsed,
        output,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::payment::compute_monthly_payment;

    fn standard_schedule() -> Vec<ScheduleEntry> {
        let pmt = compute_monthly_payment(200_000.0, 5.0, 15);
        generate_schedule(200_000.0, 5.0, 15, pmt)
    }

    #[test]
    fn test_length_matches_term() {
        let sched = standard_schedule();
        assert_eq!(sched.len(), 180);
        assert_eq!(sched[0].period, 1);
        assert_eq!(sched[179].period, 180);
    }

    #[test]
    fn test_first_period_split() {
        let sched = standard_schedule();
        // 200000 * 0.05 / 12
        assert!((sched[0].interest_portion - 833.333_333).abs() < 1e-5);
        let pmt = compute_monthly_payment(200_000.0, 5.0, 15);
        assert!((sched[0].principal_portion - (pmt - sched[0].interest_portion)).abs() < 1e-9);
    }

    #[test]
    fn test_final_balance_is_zero() {
        let sched = standard_schedule();
        assert!(sched.last().unwrap().remaining_balance.abs() < 1e-6);
    }

    #[test]
    fn test_zero_inputs_suppress_schedule() {
        assert!(generate_schedule(0.0, 5.0, 15, 1000.0).is_empty());
        assert!(generate_schedule(100_000.0, 0.0, 15, 1000.0).is_empty());
        assert!(generate_schedule(100_000.0, 5.0, 0, 1000.0).is_empty());
        assert!(generate_schedule(100_000.0, 5.0, 15, 0.0).is_empty());
        assert!(generate_schedule(100_000.0, 5.0, 15, f64::NAN).is_empty());
    }

    #[test]
    fn test_overflowing_term_yields_empty_schedule() {
        let pmt = compute_monthly_payment(100_000.0, 5.0, 400_000_000);
        assert!(generate_schedule(100_000.0, 5.0, 400_000_000, pmt).is_empty());

        let out = build_amortization(&AmortizationInput {
            principal: 100_000.0,
            annual_rate_percent: 5.0,
            term_years: 400_000_000,
            monthly_payment: None,
        });
        assert!(out.result.schedule.is_empty());
        assert_eq!(out.result.total_paid, 0.0);
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("400000000-year term"));
    }

    #[test]
    fn test_overpayment_runs_full_term_at_zero() {
        let sched = generate_schedule(10_000.0, 6.0, 1, 5_000.0);
        assert_eq!(sched.len(), 12);
        assert_eq!(sched[2].remaining_balance, 0.0);
        assert!(sched[11..].iter().all(|e| e.remaining_balance == 0.0));
    }

    #[test]
    fn test_build_warns_on_short_payment() {
        let out = build_amortization(&AmortizationInput {
            principal: 100_000.0,
            annual_rate_percent: 6.0,
            term_years: 30,
            monthly_payment: Some(550.0),
        });
        assert_eq!(out.result.schedule.len(), 360);
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("does not amortize"));
    }

    #[test]
    fn test_build_totals() {
        let out = build_amortization(&AmortizationInput {
            principal: 300_000.0,
            annual_rate_percent: 6.5,
            term_years: 30,
            monthly_payment: None,
        });
        let r = &out.result;
        assert!(out.warnings.is_empty());
        assert!((r.total_principal - 300_000.0).abs() < 1e-3);
        assert!((r.total_paid - r.monthly_payment * 360.0).abs() < 1e-3);
    }

    #[test]
    fn test_build_zero_rate_warns() {
        let out = build_amortization(&AmortizationInput {
            principal: 120_000.0,
            annual_rate_percent: 0.0,
            term_years: 10,
            monthly_payment: None,
        });
        assert_eq!(out.result.monthly_payment, 1000.0);
        assert!(out.result.schedule.is_empty());
        assert_eq!(out.warnings.len(), 1);
    }
}
