use crate::value::ResultRow;
use serde::{Deserialize, Serialize};

pub const EXECUTED_MESSAGE: &str = "Query executed successfully";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: String,
}

/// Response body of `/query`.
///
/// Exactly one shape is produced per request: rows for a read statement,
/// a message for a mutating one, or an error description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryOutcome {
    Rows {
        results: Vec<ResultRow>,
        #[serde(rename = "rowCount")]
        row_count: usize,
    },
    Executed {
        message: String,
        #[serde(rename = "rowCount")]
        row_count: u64,
    },
    Failed {
        error: String,
    },
}

impl QueryOutcome {
    pub fn rows(results: Vec<ResultRow>) -> Self {
        let row_count = results.len();
        Self::Rows { results, row_count }
    }

    pub fn executed(rows_affected: u64) -> Self {
        Self::Executed {
            message: EXECUTED_MESSAGE.to_string(),
            row_count: rows_affected,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }
}

/// Domain-level error payload shared by every gateway endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
