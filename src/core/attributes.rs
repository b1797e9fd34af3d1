//! Attributwerte eines Features (GeoJSON `properties`).

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribut-Tabelle eines Features in Original-Reihenfolge.
pub type AttributeMap = IndexMap<String, AttributeValue>;

/// Einzelner Attributwert.
///
/// `Timestamp` wird nur geschrieben (RFC 3339); beim Wiedereinlesen landet der
/// Wert als `Text` im Modell, damit fremde Zeitangaben unverändert bleiben.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    #[serde(skip_deserializing, serialize_with = "serialize_timestamp")]
    Timestamp(DateTime<Utc>),
    List(Vec<AttributeValue>),
    Object(IndexMap<String, AttributeValue>),
}

fn serialize_timestamp<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Micros, true))
}

impl AttributeValue {
    /// Liefert den Wert als Text, falls er sich als Feature-Kennung eignet.
    pub fn as_identifier(&self) -> Option<String> {
        match self {
            AttributeValue::Integer(v) => Some(v.to_string()),
            AttributeValue::Number(v) if v.fract() == 0.0 => Some(format!("{}", *v as i64)),
            AttributeValue::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }

    /// Liefert den Wert als Zahl (Integer oder Float).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Integer(v) => Some(*v as f64),
            AttributeValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "null"),
            AttributeValue::Bool(v) => write!(f, "{v}"),
            AttributeValue::Integer(v) => write!(f, "{v}"),
            AttributeValue::Number(v) => write!(f, "{v}"),
            AttributeValue::Text(v) => write!(f, "{v}"),
            AttributeValue::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
            AttributeValue::List(items) => {
                let parts: Vec<String> = items.iter().map(|i| i.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            AttributeValue::Object(map) => write!(f, "{{{} Felder}}", map.len()),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<usize> for AttributeValue {
    fn from(value: usize) -> Self {
        AttributeValue::Integer(value as i64)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<DateTime<Utc>> for AttributeValue {
    fn from(value: DateTime<Utc>) -> Self {
        AttributeValue::Timestamp(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn untagged_parsing_prefers_integer_over_float() {
        let map: AttributeMap =
            serde_json::from_str(r#"{"a": 5, "b": 5.5, "c": "x", "d": null, "e": [1, "2"]}"#)
                .expect("gültige Properties");

        assert_eq!(map["a"], AttributeValue::Integer(5));
        assert_eq!(map["b"], AttributeValue::Number(5.5));
        assert_eq!(map["c"], AttributeValue::Text("x".into()));
        assert_eq!(map["d"], AttributeValue::Null);
        assert_eq!(
            map["e"],
            AttributeValue::List(vec![
                AttributeValue::Integer(1),
                AttributeValue::Text("2".into())
            ])
        );
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn timestamp_is_written_as_rfc3339_text() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap();
        let json = serde_json::to_string(&AttributeValue::Timestamp(ts)).unwrap();
        assert_eq!(json, "\"2025-03-01T12:30:00.000000Z\"");

        let back: AttributeValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AttributeValue::Text("2025-03-01T12:30:00.000000Z".into()));
    }

    #[test]
    fn identifier_accepts_whole_numbers_and_text() {
        assert_eq!(AttributeValue::Integer(7).as_identifier().as_deref(), Some("7"));
        assert_eq!(AttributeValue::Number(7.0).as_identifier().as_deref(), Some("7"));
        assert_eq!(AttributeValue::Number(7.5).as_identifier(), None);
        assert_eq!(AttributeValue::Text(" ab ".into()).as_identifier().as_deref(), Some("ab"));
        assert_eq!(AttributeValue::Null.as_identifier(), None);
    }
}
