use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::*;

/// Level monthly payment covering principal and interest only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentResult {
    pub monthly_principal_and_interest: Money,
    pub monthly_rate: f64,
    pub total_payments: u32,
}

/// Fixed-rate annuity payment.
///
/// No validation and no rounding: degenerate input (e.g. `term_years == 0`)
/// propagates as NaN or infinity. A zero rate falls back to straight-line
/// repayment, `principal / n`. The period count is computed in `f64`, so any
/// `u32` term is accepted; very long terms tend to the interest-only payment.
pub fn compute_monthly_payment(
    principal: Money,
    annual_rate_percent: RatePercent,
    term_years: u32,
) -> Money {
    let params = LoanParameters::new(principal, annual_rate_percent, term_years);
    let r = params.monthly_rate();
    let n = params.periods();

    if r == 0.0 {
        return principal / n;
    }

    // P*r*(1+r)^n / ((1+r)^n - 1), divided through by (1+r)^n so a huge n
    // gives P*r instead of inf/inf.
    principal * r / (1.0 - (1.0 + r).powf(-n))
}

/// Payment actually used for a schedule: a positive override wins,
/// anything else (None, zero, negative, NaN) means "auto-calculate".
pub fn effective_monthly_payment(params: &LoanParameters, override_payment: Option<Money>) -> Money {
    match override_payment {
        Some(p) if p > 0.0 => p,
        _ => compute_monthly_payment(
            params.principal,
            params.annual_rate_percent,
            params.term_years,
        ),
    }
}

pub fn calculate_payment(params: &LoanParameters) -> ComputationOutput<PaymentResult> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let payment = compute_monthly_payment(
        params.principal,
        params.annual_rate_percent,
        params.term_years,
    );
    if !payment.is_finite() {
        warnings.push(format!(
            "Payment is not finite ({payment}); check term_years and rate"
        ));
    }

    let result = PaymentResult {
        monthly_principal_and_interest: payment,
        monthly_rate: params.monthly_rate(),
        total_payments: params.total_payments(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Fixed-rate annuity payment",
        params,
        warnings,
        elapsed,
        result,
    )
}
