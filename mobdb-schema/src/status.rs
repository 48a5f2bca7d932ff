use serde::{Deserialize, Serialize};

/// Snapshot of the mirrored database file, as reported by `/db_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DbStatus {
    pub exists: bool,
    pub size: u64,
    /// Modification time in seconds since the Unix epoch.
    pub modified: i64,
    /// True only on the first poll after the modification time advanced.
    pub changed: bool,
}

impl DbStatus {
    pub fn missing() -> Self {
        Self::default()
    }
}
