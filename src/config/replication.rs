use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Device-side source of the mirrored database.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Android package whose private storage holds the database.
    /// TOML: `sync.app_package`.
    pub app_package: String,

    /// File name of the database, both on the device and locally.
    /// TOML: `sync.database_name`. Default: `app.db`.
    pub database_name: String,

    /// Directory of the database relative to the app's data dir.
    /// TOML: `sync.remote_dir`. Default: `databases`.
    pub remote_dir: String,

    /// Path or name of the `adb` executable.
    /// TOML: `sync.adb_path`. Default: `adb`.
    pub adb_path: PathBuf,

    /// Seconds between pulls. Must be positive.
    /// TOML: `sync.interval_secs`. Default: `5`.
    pub interval_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            app_package: "com.example.app".to_string(),
            database_name: "app.db".to_string(),
            remote_dir: "databases".to_string(),
            adb_path: PathBuf::from("adb"),
            interval_secs: 5,
        }
    }
}

impl SyncConfig {
    /// Path of the database as passed to `run-as <pkg> cat`.
    pub fn remote_path(&self) -> String {
        let dir = self.remote_dir.trim_end_matches('/');
        if dir.is_empty() {
            self.database_name.clone()
        } else {
            format!("{dir}/{}", self.database_name)
        }
    }
}

/// Rolling backup policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackupConfig {
    /// TOML: `backup.enabled`. Default: `true`.
    pub enabled: bool,

    /// Minimum seconds between two backups.
    /// TOML: `backup.interval_secs`. Default: `3600`.
    pub interval_secs: u64,

    /// Number of backups retained; older ones are deleted.
    /// TOML: `backup.max_count`. Default: `24`.
    pub max_count: usize,

    /// TOML: `backup.dir`. Default: `backups`.
    pub dir: PathBuf,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 3600,
            max_count: 24,
            dir: PathBuf::from("backups"),
        }
    }
}
