use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single column value as exposed to gateway callers.
///
/// Serialized untagged, so each variant maps onto the matching JSON scalar.
/// Binary payloads never reach this type; they are decoded to `Text` first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// One result row keyed by column name. Keys serialize in sorted order.
pub type ResultRow = BTreeMap<String, SqlValue>;
