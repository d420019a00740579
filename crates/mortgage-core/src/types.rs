use serde::{Deserialize, Serialize};

/// Monetary amounts. Plain `f64`: the engine never rounds, presentation does.
pub type Money = f64;

/// Nominal annual rates expressed as percentages (6.5 = 6.5%).
pub type RatePercent = f64;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Raw loan parameters for a single calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    pub principal: Money,
    pub annual_rate_percent: RatePercent,
    pub term_years: u32,
}

impl LoanParameters {
    pub fn new(principal: Money, annual_rate_percent: RatePercent, term_years: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_years,
        }
    }

    /// Periodic (monthly) rate as a decimal fraction.
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 100.0 / f64::from(MONTHS_PER_YEAR)
    }

    /// Number of monthly periods, saturating at `u32::MAX` for absurd terms.
    pub fn total_payments(&self) -> u32 {
        self.term_years.saturating_mul(MONTHS_PER_YEAR)
    }

    /// Exact number of monthly periods, or `None` when it overflows `u32`.
    pub fn checked_total_payments(&self) -> Option<u32> {
        self.term_years.checked_mul(MONTHS_PER_YEAR)
    }

    /// Period count as `f64`, exact for every `u32` term.
    pub fn periods(&self) -> f64 {
        f64::from(self.term_years) * f64::from(MONTHS_PER_YEAR)
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "ieee754_f64".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_rate_and_periods() {
        let params = LoanParameters::new(300_000.0, 6.0, 30);
        assert!((params.monthly_rate() - 0.005).abs() < 1e-15);
        assert_eq!(params.total_payments(), 360);
        assert_eq!(params.checked_total_payments(), Some(360));
        assert_eq!(params.periods(), 360.0);
    }

    #[test]
    fn test_period_count_does_not_overflow() {
        let params = LoanParameters::new(100_000.0, 5.0, 400_000_000);
        assert_eq!(params.total_payments(), u32::MAX);
        assert_eq!(params.checked_total_payments(), None);
        assert_eq!(params.periods(), 4_800_000_000.0);
    }

    #[test]
    fn test_metadata_envelope() {
        let out = with_metadata("Test", &serde_json::json!({"a": 1}), vec![], 7, 42.0_f64);
        assert_eq!(out.result, 42.0);
        assert_eq!(out.metadata.computation_time_us, 7);
        assert_eq!(out.assumptions["a"], 1);
    }
}
