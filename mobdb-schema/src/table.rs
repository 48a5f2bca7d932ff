use crate::value::SqlValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of `PRAGMA table_info`, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub cid: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub declared_type: String,
    /// 1 when the column carries a NOT NULL constraint.
    pub notnull: i64,
    pub default_value: SqlValue,
    /// 1-based position within the primary key, 0 when not part of it.
    pub pk: i64,
}

impl ColumnDescriptor {
    pub fn is_not_null(&self) -> bool {
        self.notnull != 0
    }

    pub fn is_primary_key(&self) -> bool {
        self.pk != 0
    }
}

/// Table name to its columns.
pub type SchemaMap = BTreeMap<String, Vec<ColumnDescriptor>>;
