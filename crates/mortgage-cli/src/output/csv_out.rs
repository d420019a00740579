use serde_json::Value;
use std::io;

/// Write output as CSV to stdout. Numbers are written unrounded.
pub fn print_csv(value: &Value) -> csv::Result<()> {
    write_csv(io::stdout().lock(), value)
}

fn write_csv<W: io::Write>(out: W, value: &Value) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    match value {
        Value::Object(map) => match map.get("result") {
            // A schedule is the interesting part of an amortization run
            Some(Value::Object(result)) => match result.get("schedule") {
                Some(Value::Array(rows)) => write_array_csv(&mut wtr, rows)?,
                _ => write_pairs(&mut wtr, result)?,
            },
            _ => write_pairs(&mut wtr, map)?,
        },
        Value::Array(arr) => write_array_csv(&mut wtr, arr)?,
        _ => wtr.write_record([&format_csv_value(value)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn write_pairs<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    map: &serde_json::Map<String, Value>,
) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in map {
        wtr.write_record([key.as_str(), &format_csv_value(val)])?;
    }
    Ok(())
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> csv::Result<()> {
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        wtr.write_record(&headers)?;

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                wtr.write_record(&row)?;
            }
        }
    } else {
        for item in arr {
            wtr.write_record([&format_csv_value(item)])?;
        }
    }
    Ok(())
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schedule_rows() {
        let rows = vec![
            json!({"period": 1, "interest_portion": 1625.0, "principal_portion": 271.2, "remaining_balance": 299728.8}),
            json!({"period": 2, "interest_portion": 1623.5, "principal_portion": 272.7, "remaining_balance": 299456.1}),
        ];
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_array_csv(&mut wtr, &rows).unwrap();
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("period"));
        assert!(lines[2].starts_with("2,") || lines[2].contains(",2,") || lines[2].ends_with(",2"));
    }

    #[test]
    fn test_pairs_from_result_object() {
        let value = json!({"result": {"monthly_principal_and_interest": 1896.2, "total_payments": 360}});
        let mut out = Vec::new();
        write_csv(&mut out, &value).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("field,value\n"));
        assert!(out.contains("total_payments,360\n"));
    }

    /// Sink that rejects every write, like a closed pipe.
    struct ClosedPipe;

    impl io::Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_write_errors_are_reported() {
        let rows = json!([{"period": 1}, {"period": 2}]);
        let err = write_csv(ClosedPipe, &rows).unwrap_err();
        assert!(err.to_string().contains("closed"), "{err}");
    }
}
