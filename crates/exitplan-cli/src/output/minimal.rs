use serde_json::Value;

use super::{result_of, scalar_text};

/// Headline field for each command, in lookup order.
const PRIORITY_KEYS: &[&str] = &[
    "projected_value",
    "estimated_value",
    "adjusted_cash_flow",
    "overall_score",
    "recommended_years",
    "recommended_scenario",
    "total_value_increase",
    "resolved",
    "version",
];

/// Print just the headline value from the output.
///
/// Looks for a priority key in the result, then one level down in nested
/// objects, then falls back to the first field.
pub fn print_minimal(value: &Value) {
    let result = result_of(value);

    if let Value::Object(map) = result {
        if let Some(found) = find_priority(map) {
            println!("{}", scalar_text(found));
            return;
        }
        let nested = map.values().filter_map(Value::as_object);
        for child in nested {
            if let Some(found) = find_priority(child) {
                println!("{}", scalar_text(found));
                return;
            }
        }
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar_text(val));
            return;
        }
    }

    println!("{}", scalar_text(result));
}

fn find_priority(map: &serde_json::Map<String, Value>) -> Option<&Value> {
    PRIORITY_KEYS
        .iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null())
}
