use super::classify::StatementKind;
use super::materialize::{decode_value, materialize_rows};
use crate::error::MobdbError;
use mobdb_schema::{ColumnDescriptor, QueryOutcome, ResultRow, SchemaMap, SqlValue};
use sqlx::{
    ConnectOptions, Connection, Row, SqliteConnection,
    sqlite::{SqliteConnectOptions, SqliteRow},
};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Upper bound on rows returned by [`SqliteGateway::dump_table`].
pub const DATA_ROW_LIMIT: usize = 1000;

/// Executes gateway requests against the mirrored database file.
///
/// Every call opens its own connection; the replication loop may replace the
/// file between calls.
#[derive(Debug, Clone)]
pub struct SqliteGateway {
    path: PathBuf,
}

impl SqliteGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fails with "Database file not found" unless the path is a regular file.
    pub async fn ensure_present(&self) -> Result<(), MobdbError> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) if meta.is_file() => Ok(()),
            _ => Err(MobdbError::database_not_found()),
        }
    }

    async fn open(&self) -> Result<SqliteConnection, MobdbError> {
        self.ensure_present().await?;
        let conn = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(false)
            .connect()
            .await
            .inspect_err(|e| warn!(error = %e, "Error opening database"))?;
        Ok(conn)
    }

    /// Runs free-form SQL, choosing the read or mutate path by prefix.
    ///
    /// A missing file is reported before an empty statement.
    pub async fn execute(&self, sql: &str) -> Result<QueryOutcome, MobdbError> {
        self.ensure_present().await?;
        if sql.trim().is_empty() {
            return Err(MobdbError::validation("No query provided"));
        }
        let mut conn = self.open().await?;

        let kind = StatementKind::classify(sql);
        debug!(?kind, "Routing statement");
        let result = match kind {
            StatementKind::Read => fetch_rows(&mut conn, sql).await.map(QueryOutcome::rows),
            StatementKind::Mutate => sqlx::query(sql)
                .execute(&mut conn)
                .await
                .map(|done| QueryOutcome::executed(done.rows_affected()))
                .map_err(MobdbError::from),
        };

        close(conn).await;
        result.inspect_err(|e| warn!(error = %e, "Statement failed"))
    }

    /// Table name to column descriptors for every table in the catalog.
    pub async fn schema(&self) -> Result<SchemaMap, MobdbError> {
        let mut conn = self.open().await?;
        let result = read_schema(&mut conn).await;
        close(conn).await;
        result
    }

    /// Up to [`DATA_ROW_LIMIT`] rows of `table`.
    pub async fn dump_table(&self, table: &str) -> Result<Vec<ResultRow>, MobdbError> {
        let mut conn = self.open().await?;
        let sql = format!(
            "SELECT * FROM {} LIMIT {DATA_ROW_LIMIT}",
            quote_identifier(table)
        );
        let result = fetch_rows(&mut conn, &sql).await;
        close(conn).await;
        result.inspect_err(|e| warn!(table, error = %e, "Error querying table data"))
    }
}

async fn fetch_rows(conn: &mut SqliteConnection, sql: &str) -> Result<Vec<ResultRow>, MobdbError> {
    let rows = sqlx::query(sql).fetch_all(&mut *conn).await?;
    Ok(materialize_rows(&rows, |i, e| {
        warn!(row = i, error = %e, "Error scanning row");
    }))
}

async fn read_schema(conn: &mut SqliteConnection) -> Result<SchemaMap, MobdbError> {
    let tables: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table'")
            .fetch_all(&mut *conn)
            .await
            .inspect_err(|e| warn!(error = %e, "Error querying tables"))?;

    let mut schema = SchemaMap::new();
    for table in tables {
        let pragma = format!("PRAGMA table_info({})", quote_identifier(&table));
        let rows = match sqlx::query(&pragma).fetch_all(&mut *conn).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(table = %table, error = %e, "Error getting schema for table");
                continue;
            }
        };

        let columns = rows
            .iter()
            .filter_map(|row| {
                column_descriptor(row)
                    .inspect_err(|e| warn!(table = %table, error = %e, "Error scanning column info"))
                    .ok()
            })
            .collect();
        schema.insert(table, columns);
    }
    Ok(schema)
}

/// Maps one `PRAGMA table_info` row: `cid, name, type, notnull, dflt_value, pk`.
fn column_descriptor(row: &SqliteRow) -> Result<ColumnDescriptor, sqlx::Error> {
    Ok(ColumnDescriptor {
        cid: row.try_get("cid")?,
        name: row.try_get("name")?,
        declared_type: row.try_get("type")?,
        notnull: row.try_get("notnull")?,
        default_value: SqlValue::from(decode_value(row, 4)?),
        pk: row.try_get("pk")?,
    })
}

async fn close(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        debug!(error = %e, "Error closing database connection");
    }
}

/// Double-quotes an identifier, doubling any embedded quote.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_quoted_and_escaped() {
        assert_eq!(quote_identifier("users"), r#""users""#);
        assert_eq!(quote_identifier(r#"we"ird"#), r#""we""ird""#);
    }
}
