//! Replication engine: pulls the device database on a fixed cadence and keeps
//! a rolling set of backups.
//!
//! Layout:
//! - `puller.rs`: the `Puller` capability and its `adb` implementation
//! - `snapshot.rs`: timestamped backups and retention

pub mod puller;
pub mod snapshot;

pub use puller::{AdbPuller, Puller};
pub use snapshot::SnapshotStore;

use chrono::Local;
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};
use tokio::{fs, sync::watch, task::JoinHandle};
use tracing::{error, info, warn};

/// Resolved settings for one run of the replication loop.
#[derive(Debug, Clone)]
pub struct ReplicationConfig {
    pub app_package: String,
    pub remote_path: String,
    pub local_path: PathBuf,
    pub sync_interval: Duration,
    pub backup_enabled: bool,
    pub backup_interval: Duration,
    pub backup_max_count: usize,
    pub backup_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    PullFailed,
    WriteFailed,
    StatFailed,
    Synced { bytes: u64, backup: BackupOutcome },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    Disabled,
    NotDue,
    Created(PathBuf),
    Failed,
}

pub struct ReplicationLoop<P> {
    cfg: ReplicationConfig,
    puller: P,
    store: SnapshotStore,
    last_backup: Option<Instant>,
}

impl<P: Puller + 'static> ReplicationLoop<P> {
    pub fn new(cfg: ReplicationConfig, puller: P) -> Self {
        let store = SnapshotStore::new(cfg.backup_dir.clone());
        Self {
            cfg,
            puller,
            store,
            last_backup: None,
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Runs the loop on its own task. The returned handle completes once the
    /// loop has observed the stop flag.
    pub fn spawn(self, stop: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(stop))
    }

    /// Cycles until `stop` reads `true`. The flag is only checked between
    /// cycles, after the sleep has completed.
    pub async fn run(mut self, stop: watch::Receiver<bool>) {
        info!(
            app_package = %self.cfg.app_package,
            remote_path = %self.cfg.remote_path,
            sync_interval_secs = self.cfg.sync_interval.as_secs_f64(),
            "Database sync started"
        );

        while !*stop.borrow() {
            self.sync_once().await;
            tokio::time::sleep(self.cfg.sync_interval).await;
        }

        info!("Database sync stopped");
    }

    /// One pull, stat and backup-decision cycle. Failures end the cycle only.
    pub async fn sync_once(&mut self) -> CycleOutcome {
        let started = Instant::now();

        let bytes = match self
            .puller
            .pull(&self.cfg.app_package, &self.cfg.remote_path)
            .await
        {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, "Error syncing database");
                return CycleOutcome::PullFailed;
            }
        };

        if let Err(e) = fs::write(&self.cfg.local_path, &bytes).await {
            error!(
                path = %self.cfg.local_path.display(),
                error = %e,
                "Error writing synced database"
            );
            return CycleOutcome::WriteFailed;
        }

        let size = match fs::metadata(&self.cfg.local_path).await {
            Ok(meta) => meta.len(),
            Err(e) => {
                error!(path = %self.cfg.local_path.display(), error = %e, "Sync failed");
                return CycleOutcome::StatFailed;
            }
        };

        info!(
            timestamp = %Local::now().format("%Y-%m-%d %H:%M:%S"),
            bytes = size,
            "Database synced successfully"
        );

        let backup = self.maybe_backup(started).await;
        CycleOutcome::Synced { bytes: size, backup }
    }

    async fn maybe_backup(&mut self, now: Instant) -> BackupOutcome {
        if !self.cfg.backup_enabled {
            return BackupOutcome::Disabled;
        }

        let due = self
            .last_backup
            .is_none_or(|last| now.saturating_duration_since(last) > self.cfg.backup_interval);
        if !due {
            return BackupOutcome::NotDue;
        }

        match self
            .store
            .create_backup(&self.cfg.local_path, self.cfg.backup_max_count)
            .await
        {
            Ok(path) => {
                self.last_backup = Some(now);
                BackupOutcome::Created(path)
            }
            Err(e) => {
                warn!(error = %e, "Backup attempt failed; will retry next cycle");
                BackupOutcome::Failed
            }
        }
    }
}
