//! Numeric records returned by providers and produced by strategies.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::CoalesceError;

/// One provider's view of an entity: field name to numeric value.
pub type Record = BTreeMap<String, Decimal>;

/// Combined result across all retrieved records.
pub type AggregateRecord = BTreeMap<String, Decimal>;

/// Interpret a decoded JSON body as a [`Record`].
///
/// The body must be an object whose values are all numbers; integers are kept
/// exact and floats go through `Decimal::try_from(f64)`.
///
/// # Errors
/// Returns `Data` tagged with `provider` for non-object bodies, non-numeric values,
/// or floats that do not fit a `Decimal`.
pub fn record_from_json(provider: &str, body: &Value) -> Result<Record, CoalesceError> {
    let Value::Object(fields) = body else {
        return Err(CoalesceError::data(
            provider,
            format!("expected a JSON object, got {}", kind_of(body)),
        ));
    };

    let mut out = Record::new();
    for (field, value) in fields {
        let Value::Number(n) = value else {
            return Err(CoalesceError::data(
                provider,
                format!("field `{field}` is {}, not a number", kind_of(value)),
            ));
        };
        let d = if let Some(i) = n.as_i64() {
            Decimal::from(i)
        } else if let Some(u) = n.as_u64() {
            Decimal::from(u)
        } else {
            n.as_f64()
                .and_then(|f| Decimal::try_from(f).ok())
                .ok_or_else(|| {
                    CoalesceError::data(provider, format!("field `{field}` is out of range: {n}"))
                })?
        };
        out.insert(field.clone(), d);
    }
    Ok(out)
}

const fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
