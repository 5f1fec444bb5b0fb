use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{flatten, scalar_text};

/// Format output as tables using the tabled crate. Scalar fields go into a
/// Field/Value table; arrays of objects (recommendations, scenarios,
/// milestones) each get their own table.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => {
                print_fields(result);
                print_envelope_notes(map);
            }
            None => print_fields(value),
        },
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{value}"),
    }
}

fn print_fields(value: &Value) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut sections: Vec<(String, Vec<Value>)> = Vec::new();

    for (key, val) in flatten(value) {
        match val {
            Value::Array(items) if items.iter().any(Value::is_object) => {
                sections.push((key, items));
            }
            other => builder.push_record([key, scalar_text(&other)]),
        }
    }

    println!("{}", Table::from(builder));
    for (title, items) in sections {
        println!("\n{title}:");
        print_array_table(&items);
    }
}

fn print_envelope_notes(envelope: &serde_json::Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}

fn print_array_table(arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            println!("{}", scalar_text(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());

    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(h).map(scalar_text).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }

    println!("{}", Table::from(builder));
}
