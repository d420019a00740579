pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use crate::OutputFormat;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => {
            if let Err(e) = csv_out::print_csv(value) {
                crate::fail(format!("failed to write CSV: {e}"));
            }
        }
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Round an amount to cents for display, half away from zero.
/// None for NaN and infinities.
pub fn to_cents(amount: f64) -> Option<Decimal> {
    let mut cents =
        Decimal::from_f64(amount)?.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    cents.rescale(2);
    Some(cents)
}

/// Rates and percentages keep full precision; other floats are shown as cents.
fn is_rate_field(key: &str) -> bool {
    key.ends_with("rate") || key.ends_with("percent") || key.ends_with("Rate")
}

/// Human-readable rendering of a single field for table and minimal output.
pub fn display_field(key: &str, value: &Value) -> String {
    match value {
        Value::Number(n) if n.is_f64() && !is_rate_field(key) => n
            .as_f64()
            .and_then(to_cents)
            .map(|d| d.to_string())
            .unwrap_or_else(|| n.to_string()),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(|v| display_field(key, v)).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
