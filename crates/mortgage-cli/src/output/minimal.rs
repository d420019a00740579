use serde_json::Value;

use super::display_field;

/// Key answer fields, most specific first.
const PRIORITY_KEYS: [&str; 6] = [
    "total_monthly",
    "monthly_principal_and_interest",
    "monthly_payment",
    "removed",
    "id",
    "loan_amount",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    match value {
        // History listings: one id per line
        Value::Array(items) => {
            for item in items {
                if let Some(id) = item.get("id").and_then(Value::as_str) {
                    println!("{id}");
                }
            }
        }
        _ => println!("{}", minimal_line(value)),
    }
}

fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                return display_field(key, val);
            }
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, display_field(key, val));
        }
    }

    display_field("", result_obj)
}
