use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::payment::compute_monthly_payment;
use crate::types::*;

/// Inputs of the home-purchase calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInput {
    pub home_price: Money,
    pub down_payment_percent: RatePercent,
    pub annual_rate_percent: RatePercent,
    pub term_years: u32,
    #[serde(default)]
    pub property_tax_rate_percent: RatePercent,
    #[serde(default)]
    pub insurance_monthly: Money,
    #[serde(default)]
    pub hoa_monthly: Money,
}

/// Monthly cost breakdown for a home purchase
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MortgageBreakdown {
    pub down_payment_amount: Money,
    pub loan_amount: Money,
    pub monthly_principal_and_interest: Money,
    pub monthly_tax: Money,
    pub total_monthly: Money,
}

/// Down payment, loan size and all-in monthly cost of a purchase.
pub fn calculate_mortgage(input: &MortgageInput) -> ComputationOutput<MortgageBreakdown> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let breakdown = if input.home_price == 0.0 || input.home_price.is_nan() || input.term_years == 0
    {
        warnings.push("Home price and term are required; all amounts reported as zero".into());
        MortgageBreakdown::default()
    } else {
        let down_payment_amount = input.home_price * input.down_payment_percent / 100.0;
        let loan_amount = (input.home_price - down_payment_amount).max(0.0);
        let rate = if input.annual_rate_percent > 0.0 {
            input.annual_rate_percent
        } else {
            0.0
        };
        let monthly_principal_and_interest =
            compute_monthly_payment(loan_amount, rate, input.term_years);
        let monthly_tax =
            input.home_price * (input.property_tax_rate_percent / 100.0) / f64::from(MONTHS_PER_YEAR);

        MortgageBreakdown {
            down_payment_amount,
            loan_amount,
            monthly_principal_and_interest,
            monthly_tax,
            total_monthly: monthly_principal_and_interest
                + monthly_tax
                + input.insurance_monthly
                + input.hoa_monthly,
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Home purchase payment (P&I + tax + insurance + HOA)",
        input,
        warnings,
        elapsed,
        breakdown,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_input() -> MortgageInput {
        MortgageInput {
            home_price: 750_000.0,
            down_payment_percent: 20.0,
            annual_rate_percent: 6.5,
            term_years: 30,
            property_tax_rate_percent: 1.2,
            insurance_monthly: 120.0,
            hoa_monthly: 0.0,
        }
    }

    #[test]
    fn test_default_purchase() {
        let out = calculate_mortgage(&default_input());
        let b = out.result;
        assert_eq!(b.down_payment_amount, 150_000.0);
        assert_eq!(b.loan_amount, 600_000.0);
        assert!((b.monthly_principal_and_interest - 3792.41).abs() < 0.01);
        assert!((b.monthly_tax - 750.0).abs() < 1e-9);
        assert!((b.total_monthly - (b.monthly_principal_and_interest + 870.0)).abs() < 1e-9);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_missing_price_zeroes_everything() {
        let mut input = default_input();
        input.home_price = 0.0;
        let out = calculate_mortgage(&input);
        assert_eq!(out.result, MortgageBreakdown::default());
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_down_payment_above_price_clamps_loan() {
        let mut input = default_input();
        input.down_payment_percent = 120.0;
        let b = calculate_mortgage(&input).result;
        assert_eq!(b.loan_amount, 0.0);
        assert_eq!(b.monthly_principal_and_interest, 0.0);
    }

    #[test]
    fn test_negative_rate_treated_as_zero() {
        let mut input = default_input();
        input.annual_rate_percent = -3.0;
        let b = calculate_mortgage(&input).result;
        assert_eq!(b.monthly_principal_and_interest, 600_000.0 / 360.0);
    }
}
