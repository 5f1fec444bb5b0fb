use serde_json::Value;
use std::io;

use super::{flatten, result_of, scalar_text};

/// Write the result as CSV to stdout.
///
/// Arrays of objects become one row per element; anything else is written
/// as two-column `field,value` rows with dotted paths for nested fields.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let outcome = match result_of(value) {
        Value::Array(arr) => write_rows(&mut wtr, arr),
        other => write_fields(&mut wtr, other),
    };
    if let Err(e) = outcome.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        eprintln!("CSV write error: {e}");
    }
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) -> Result<(), csv::Error> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in flatten(value) {
        wtr.write_record([key, scalar_text(&val)])?;
    }
    Ok(())
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> Result<(), csv::Error> {
    let Some(first) = arr.first() else {
        return Ok(());
    };
    let headers: Vec<String> = flatten(first).into_iter().map(|(k, _)| k).collect();
    wtr.write_record(&headers)?;

    for item in arr {
        let flat = flatten(item);
        let row: Vec<String> = headers
            .iter()
            .map(|h| {
                flat.iter()
                    .find(|(k, _)| k == h)
                    .map(|(_, v)| scalar_text(v))
                    .unwrap_or_default()
            })
            .collect();
        wtr.write_record(&row)?;
    }
    Ok(())
}
