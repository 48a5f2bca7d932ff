//! Timestamped full-file backups with count-based retention.
//!
//! Backup names are `{base}_{YYYYMMDD_HHMMSS}.db`, where `base` is the source
//! file name including its extension. The timestamp is fixed width, so sorting
//! names lexicographically sorts them by creation time.

use crate::error::MobdbError;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
/// `YYYYMMDD_HHMMSS`
const TIMESTAMP_LEN: usize = 15;
const BACKUP_EXTENSION: &str = ".db";

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copies `source` into the backup directory and prunes old copies so at
    /// most `max_count` remain.
    pub async fn create_backup(
        &self,
        source: &Path,
        max_count: usize,
    ) -> Result<PathBuf, MobdbError> {
        self.create_backup_at(source, max_count, Local::now()).await
    }

    /// Same as [`Self::create_backup`] with an explicit timestamp for the name.
    ///
    /// A backup created within the same second as an existing one replaces it.
    pub async fn create_backup_at(
        &self,
        source: &Path,
        max_count: usize,
        at: DateTime<Local>,
    ) -> Result<PathBuf, MobdbError> {
        let base = base_name(source)?;

        fs::create_dir_all(&self.dir).await.inspect_err(|e| {
            warn!(dir = %self.dir.display(), error = %e, "Error creating backup directory");
        })?;

        let content = fs::read(source).await.inspect_err(|e| {
            warn!(source = %source.display(), error = %e, "Error reading database file for backup");
        })?;

        let backup_path = self.dir.join(backup_file_name(&base, at));
        fs::write(&backup_path, &content).await.inspect_err(|e| {
            warn!(path = %backup_path.display(), error = %e, "Error creating backup");
        })?;
        info!(path = %backup_path.display(), bytes = content.len(), "Created backup");

        self.prune(&base, max_count).await?;
        Ok(backup_path)
    }

    /// Backups of `base` in the directory, oldest first.
    pub async fn list_backups(&self, base: &str) -> Result<Vec<PathBuf>, MobdbError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if is_backup_of(name, base) && entry.file_type().await?.is_file() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names.into_iter().map(|n| self.dir.join(n)).collect())
    }

    /// Deletes the oldest backups beyond `max_count`. Individual deletions are
    /// best effort; returns how many files were removed.
    pub async fn prune(&self, base: &str, max_count: usize) -> Result<usize, MobdbError> {
        let backups = self.list_backups(base).await.inspect_err(|e| {
            warn!(dir = %self.dir.display(), error = %e, "Error listing backup files");
        })?;

        if backups.len() <= max_count {
            return Ok(0);
        }

        let excess = backups.len() - max_count;
        let mut removed = 0;
        for stale in &backups[..excess] {
            match fs::remove_file(stale).await {
                Ok(()) => {
                    removed += 1;
                    info!(path = %stale.display(), "Removed old backup");
                }
                Err(e) => {
                    warn!(path = %stale.display(), error = %e, "Failed to remove old backup");
                }
            }
        }
        Ok(removed)
    }
}

pub fn backup_file_name(base: &str, at: DateTime<Local>) -> String {
    format!("{base}_{}{BACKUP_EXTENSION}", at.format(TIMESTAMP_FORMAT))
}

fn base_name(source: &Path) -> Result<String, MobdbError> {
    source
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            MobdbError::validation(format!(
                "backup source has no usable file name: {}",
                source.display()
            ))
        })
}

fn is_backup_of(name: &str, base: &str) -> bool {
    let Some(rest) = name
        .strip_prefix(base)
        .and_then(|r| r.strip_prefix('_'))
        .and_then(|r| r.strip_suffix(BACKUP_EXTENSION))
    else {
        return false;
    };

    rest.len() == TIMESTAMP_LEN
        && rest.char_indices().all(|(i, c)| {
            if i == 8 {
                c == '_'
            } else {
                c.is_ascii_digit()
            }
        })
}
