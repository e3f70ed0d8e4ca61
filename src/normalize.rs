//! Request normalizer: loose JSON document in, typed [`FeatureRecord`] out.
//!
//! Coercion rules mirror the contract the model artifact was trained
//! against:
//! - an absent or null string field becomes the literal `"None"`, so string
//!   columns can never distinguish "absent" from the word "None";
//! - the binary flags map to "yes" only when the value's string form is
//!   exactly `"1"` (strict equality, not truthiness);
//! - numeric fields accept numbers or numeric strings and otherwise fail
//!   with a validation error.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::FeatureRecord;

/// Normalize an arbitrary input document into a feature record.
pub fn normalize(doc: &Value) -> Result<FeatureRecord> {
    Ok(FeatureRecord {
        gender: string_field(doc, "gender"),
        age: int_field(doc, "age")?,
        hypertension: flag_field(doc, "hypertension"),
        heart_disease: flag_field(doc, "heart_disease"),
        smoking_history: string_field(doc, "smoking_history"),
        bmi: float_field(doc, "bmi")?,
        hba1c_level: float_field(doc, "HbA1c_level")?,
        blood_glucose_level: int_field(doc, "blood_glucose_level")?,
    })
}

/// String form of a field value; absent and null both render as "None".
fn string_form(doc: &Value, key: &str) -> String {
    match doc.get(key) {
        None | Some(Value::Null) => "None".to_owned(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

fn string_field(doc: &Value, key: &str) -> String {
    string_form(doc, key)
}

/// "yes" iff the string form is exactly "1"; everything else is "no".
fn flag_field(doc: &Value, key: &str) -> String {
    if string_form(doc, key) == "1" {
        "yes".to_owned()
    } else {
        "no".to_owned()
    }
}

fn int_field(doc: &Value, key: &str) -> Result<i64> {
    let invalid = || Error::Validation(format!("field `{key}` must be an integer"));
    match doc.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            // Fractional input truncates toward zero.
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .ok_or_else(invalid),
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn float_field(doc: &Value, key: &str) -> Result<f64> {
    let invalid = || Error::Validation(format!("field `{key}` must be a number"));
    match doc.get(key) {
        Some(Value::Number(n)) => n.as_f64().ok_or_else(invalid),
        Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}
