//! Typed JSON columns.
//!
//! Free-form documents are restricted to flat maps so that nested objects, arrays and
//! booleans are rejected when the payload is deserialised at the boundary.

use std::collections::BTreeMap;

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// A scalar stored under a [`Document`] key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for DocumentValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for DocumentValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for DocumentValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Flat string-keyed map of numbers or strings (saved searches, revenue metrics).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Document(pub BTreeMap<String, DocumentValue>);

impl<K, V> FromIterator<(K, V)> for Document
where
    K: Into<String>,
    V: Into<DocumentValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Frequency map: key to a non-negative count (search terms, models, locations).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Tally(pub BTreeMap<String, u64>);

impl Tally {
    /// The `n` most frequent entries, highest count first; ties broken by key.
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self.0.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }

    /// Render the top `n` entries as `"term (count), ..."`, or `"No data"`.
    #[must_use]
    pub fn summary(&self, n: usize) -> String {
        let top = self.top(n);
        if top.is_empty() {
            return "No data".to_string();
        }
        top.iter()
            .map(|(term, count)| format!("{term} ({count})"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for Tally {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_accepts_scalars() {
        let doc: Document =
            serde_json::from_str(r#"{"make":"Toyota","max_price":30000,"min_rating":4.5}"#)
                .unwrap_or_default();
        assert_eq!(doc.0.get("make"), Some(&DocumentValue::Text("Toyota".to_string())));
        assert_eq!(doc.0.get("max_price"), Some(&DocumentValue::Integer(30000)));
        assert_eq!(doc.0.get("min_rating"), Some(&DocumentValue::Float(4.5)));
    }

    #[test]
    fn test_document_rejects_nested_values() {
        assert!(serde_json::from_str::<Document>(r#"{"a":{"b":1}}"#).is_err());
        assert!(serde_json::from_str::<Document>(r#"{"a":[1,2]}"#).is_err());
        assert!(serde_json::from_str::<Document>(r#"{"a":true}"#).is_err());
    }

    #[test]
    fn test_tally_rejects_negative_counts() {
        assert!(serde_json::from_str::<Tally>(r#"{"toyota":-1}"#).is_err());
        assert!(serde_json::from_str::<Tally>(r#"{"toyota":"many"}"#).is_err());
    }

    #[test]
    fn test_tally_summary_top_three() {
        let tally: Tally = [
            ("toyota", 15),
            ("honda", 12),
            ("bmw", 8),
            ("tesla", 10),
            ("mercedes", 6),
        ]
        .into_iter()
        .collect();
        assert_eq!(tally.summary(3), "toyota (15), honda (12), tesla (10)");
        assert_eq!(Tally::default().summary(3), "No data");
    }
}
