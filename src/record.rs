//! Turning structured records into candidates.
//!
//! A record such as
//!
//! ```json
//! { "patient": { "nom": "Dupont", "prenoms": ["Paul", "Pierre"] },
//!   "intervention": { "salle": 3 } }
//! ```
//!
//! yields the fields `patient.nom` (one candidate), `patient.prenoms` (two
//! candidates, either of which confirms the field) and `intervention.salle`.

use serde_json::Value;

use matcher::Candidate;

/// Label used when the record itself is a scalar or an array.
pub const ROOT_LABEL: &str = "value";

/// One field of a record and every value that confirms it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordField {
    pub label: String,
    pub candidates: Vec<Candidate>,
}

/// Flatten `record` into fields, in document order.
///
/// Nested objects extend the label with a dot. Array elements become
/// alternative candidates of the same field; objects inside arrays are
/// flattened under the array's label. `null` values and empty strings are
/// skipped, and fields left without candidates are dropped.
pub fn record_fields(record: &Value) -> Vec<RecordField> {
    let mut fields: Vec<RecordField> = Vec::new();
    match record {
        Value::Object(_) => walk(record, "", &mut fields),
        _ => walk(record, ROOT_LABEL, &mut fields),
    }
    fields
}

/// Every candidate of [`record_fields`], flattened.
pub fn candidates_from_record(record: &Value) -> Vec<Candidate> {
    record_fields(record)
        .into_iter()
        .flat_map(|field| field.candidates)
        .collect()
}

fn walk(value: &Value, label: &str, fields: &mut Vec<RecordField>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if label.is_empty() {
                    key.clone()
                } else {
                    format!("{label}.{key}")
                };
                walk(child, &path, fields);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, label, fields);
            }
        }
        Value::Null => {}
        scalar => {
            let Some(text) = scalar_text(scalar) else {
                return;
            };
            let candidate = Candidate::new(label, text);
            match fields.iter_mut().find(|f| f.label == label) {
                Some(field) => field.candidates.push(candidate),
                None => fields.push(RecordField {
                    label: label.to_string(),
                    candidates: vec![candidate],
                }),
            }
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
