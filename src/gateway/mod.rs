//! Query gateway core: statement routing, row materialization and file
//! freshness, independent of the HTTP layer.
//!
//! Layout:
//! - `classify.rs`: read vs. mutate prefix classification
//! - `materialize.rs`: engine rows to `ResultRow`
//! - `sqlite.rs`: per-request connections, query/schema/dump operations
//! - `freshness.rs`: modification-time edge detection for `/db_status`

pub mod classify;
pub mod freshness;
pub mod materialize;
pub mod sqlite;

pub use classify::StatementKind;
pub use freshness::FreshnessTracker;
pub use sqlite::{DATA_ROW_LIMIT, SqliteGateway};
