use serde_json::{Map, Number, Value};

/// A single JSON object record as exported (figure, region, site, ...).
pub type Record = Map<String, Value>;

/// Truthiness as the exporter's consumers understand it: `null`, `false`,
/// `0` and `""` are absent; arrays and objects are always present.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Coerce an absent, single, or repeated field into a sequence.
///
/// Arrays come back element-wise, any other truthy value becomes a
/// one-element sequence, and falsy values yield nothing.
pub fn normalize_to_array(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(v) if is_truthy(v) => vec![v],
        _ => Vec::new(),
    }
}

/// Like [`normalize_to_array`], keeping only object entries.
///
/// Scalar entries can never carry an id or coordinates, so dropping them
/// here means downstream passes never re-check shape.
pub fn records(value: Option<&Value>) -> Vec<&Record> {
    normalize_to_array(value)
        .into_iter()
        .filter_map(Value::as_object)
        .collect()
}

/// Lookup key for a record id. Missing or falsy ids have no key.
pub fn id_key(value: Option<&Value>) -> Option<String> {
    let value = value?;
    if !is_truthy(value) {
        return None;
    }
    scalar_key(value)
}

/// String form of a scalar leaf, used when ids are compared across types.
/// Whole-valued floats print as integers, so `7.0` keys the same as `7`.
pub fn scalar_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_key(n)),
        _ => None,
    }
}

fn number_key(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

/// First truthy value among `keys` in `record`.
pub fn first_truthy<'a>(record: &'a Record, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| record.get(*k))
        .find(|v| is_truthy(v))
}

/// Overlay the top-level keys of `overlay` onto a copy of `base`.
///
/// Nested objects are replaced, never merged.
pub fn shallow_merge(base: Option<&Record>, overlay: Option<&Record>) -> Record {
    let mut merged = base.cloned().unwrap_or_default();
    if let Some(overlay) = overlay {
        for (key, value) in overlay {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}
