//! Lenient field decoders
//!
//! The tracking server is an external collaborator, so optional fields may
//! be missing, `null`, or carry an unexpected JSON type. These decoders
//! degrade such values to a default instead of failing the whole payload.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Non-negative count. Floats are floored, numeric strings are parsed,
/// anything else is zero.
pub(crate) fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f.floor() as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Optional text. Numbers and booleans are stringified (tracker ids are
/// sometimes sent as integers).
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_text))
}

/// List of identifiers. A non-array value yields an empty list; array
/// entries that are not scalars are skipped.
pub(crate) fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.into_iter().filter_map(value_to_text).collect(),
        _ => Vec::new(),
    })
}

/// Optional number of minutes
pub(crate) fn minutes<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "super::count")]
        count: u64,
        #[serde(default, deserialize_with = "super::text")]
        name: Option<String>,
        #[serde(default, deserialize_with = "super::text_list")]
        items: Vec<String>,
        #[serde(default, deserialize_with = "super::minutes")]
        minutes: Option<f64>,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_missing_fields_default() {
        let p = probe("{}");
        assert_eq!(p.count, 0);
        assert_eq!(p.name, None);
        assert!(p.items.is_empty());
        assert_eq!(p.minutes, None);
    }

    #[test]
    fn test_null_fields_default() {
        let p = probe(r#"{"count": null, "name": null, "items": null, "minutes": null}"#);
        assert_eq!(p.count, 0);
        assert_eq!(p.name, None);
        assert!(p.items.is_empty());
        assert_eq!(p.minutes, None);
    }

    #[test]
    fn test_count_variants() {
        assert_eq!(probe(r#"{"count": 3}"#).count, 3);
        assert_eq!(probe(r#"{"count": 2.7}"#).count, 2);
        assert_eq!(probe(r#"{"count": -4}"#).count, 0);
        assert_eq!(probe(r#"{"count": " 5 "}"#).count, 5);
        assert_eq!(probe(r#"{"count": "many"}"#).count, 0);
        assert_eq!(probe(r#"{"count": [1]}"#).count, 0);
    }

    #[test]
    fn test_text_variants() {
        assert_eq!(probe(r#"{"name": "p1"}"#).name.as_deref(), Some("p1"));
        assert_eq!(probe(r#"{"name": 17}"#).name.as_deref(), Some("17"));
        assert_eq!(probe(r#"{"name": {"a": 1}}"#).name, None);
    }

    #[test]
    fn test_list_variants() {
        assert_eq!(probe(r#"{"items": ["a", 2, null, "b"]}"#).items, vec!["a", "2", "b"]);
        assert!(probe(r#"{"items": "a,b"}"#).items.is_empty());
    }

    #[test]
    fn test_minutes_variants() {
        assert_eq!(probe(r#"{"minutes": 12.5}"#).minutes, Some(12.5));
        assert_eq!(probe(r#"{"minutes": "7"}"#).minutes, Some(7.0));
        assert_eq!(probe(r#"{"minutes": true}"#).minutes, None);
    }
}
