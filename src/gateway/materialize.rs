//! Turns engine rows into transport-neutral `ResultRow`s.

use mobdb_schema::{ResultRow, SqlValue};
use sqlx::{Column, Row, TypeInfo, ValueRef, sqlite::SqliteRow};

/// A value as natively decoded from SQLite, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    Boolean(bool),
}

impl From<RawValue> for SqlValue {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Null => SqlValue::Null,
            RawValue::Integer(v) => SqlValue::Integer(v),
            RawValue::Real(v) => SqlValue::Real(v),
            RawValue::Text(v) => SqlValue::Text(v),
            RawValue::Blob(bytes) => SqlValue::Text(String::from_utf8_lossy(&bytes).into_owned()),
            RawValue::Boolean(v) => SqlValue::Boolean(v),
        }
    }
}

/// Zips column names with one row's values. A repeated column name keeps the
/// value of its last occurrence.
pub fn materialize(columns: &[String], values: Vec<RawValue>) -> ResultRow {
    columns
        .iter()
        .cloned()
        .zip(values.into_iter().map(SqlValue::from))
        .collect()
}

pub fn column_names(row: &SqliteRow) -> Vec<String> {
    row.columns().iter().map(|c| c.name().to_string()).collect()
}

pub fn decode_row(row: &SqliteRow) -> Result<Vec<RawValue>, sqlx::Error> {
    (0..row.len()).map(|idx| decode_value(row, idx)).collect()
}

/// Dispatches on the storage class of the stored value rather than the
/// declared column type, which SQLite does not enforce.
pub fn decode_value(row: &SqliteRow, idx: usize) -> Result<RawValue, sqlx::Error> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(RawValue::Null);
    }
    let kind = raw.type_info().name().to_ascii_uppercase();

    let value = match kind.as_str() {
        "INTEGER" | "INT8" | "BIGINT" => RawValue::Integer(row.try_get_unchecked(idx)?),
        "REAL" | "FLOAT" | "DOUBLE" => RawValue::Real(row.try_get_unchecked(idx)?),
        "BLOB" => RawValue::Blob(row.try_get_unchecked(idx)?),
        "BOOLEAN" => RawValue::Boolean(row.try_get_unchecked(idx)?),
        _ => RawValue::Text(row.try_get_unchecked(idx)?),
    };
    Ok(value)
}

/// Materializes a full result set; rows that fail to decode are reported via
/// `on_skip` and left out.
pub fn materialize_rows<F>(rows: &[SqliteRow], mut on_skip: F) -> Vec<ResultRow>
where
    F: FnMut(usize, &sqlx::Error),
{
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    let columns = column_names(first);

    rows.iter()
        .enumerate()
        .filter_map(|(i, row)| match decode_row(row) {
            Ok(values) => Some(materialize(&columns, values)),
            Err(e) => {
                on_skip(i, &e);
                None
            }
        })
        .collect()
}
