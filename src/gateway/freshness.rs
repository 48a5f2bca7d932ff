use mobdb_schema::DbStatus;
use std::{
    path::Path,
    sync::atomic::{AtomicI64, Ordering},
    time::UNIX_EPOCH,
};
use tokio::fs;
use tracing::warn;

/// One-shot edge detector over the database file's modification time.
///
/// Only the latest observed instant is kept. Concurrent pollers race on a
/// single atomic: when the file advances, exactly one of them sees
/// `changed = true`.
#[derive(Debug, Default)]
pub struct FreshnessTracker {
    last_modified: AtomicI64,
}

impl FreshnessTracker {
    pub fn last_modified(&self) -> i64 {
        self.last_modified.load(Ordering::Acquire)
    }

    pub async fn check_status(&self, path: &Path) -> DbStatus {
        let meta = match fs::metadata(path).await {
            Ok(meta) if meta.is_file() => meta,
            Ok(_) => return DbStatus::missing(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return DbStatus::missing(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Error getting file info");
                return DbStatus::missing();
            }
        };

        let modified = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .and_then(|d| i64::try_from(d.as_secs()).ok())
            .unwrap_or(0);

        let previous = self.last_modified.fetch_max(modified, Ordering::AcqRel);

        DbStatus {
            exists: true,
            size: meta.len(),
            modified,
            changed: modified > previous,
        }
    }
}
