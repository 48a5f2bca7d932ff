pub mod query;
pub mod status;
pub mod table;
pub mod value;

pub use query::{ErrorBody, QueryOutcome, QueryRequest};
pub use status::DbStatus;
pub use table::{ColumnDescriptor, SchemaMap};
pub use value::{ResultRow, SqlValue};
