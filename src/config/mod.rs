mod basic;
mod replication;

pub use basic::BasicConfig;
pub use replication::{BackupConfig, SyncConfig};

use crate::error::MobdbError;
use crate::replication::ReplicationConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Gateway and logging settings (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Device pull settings (see `sync` table in config.toml).
    #[serde(default)]
    pub sync: SyncConfig,

    /// Backup retention settings (see `backup` table in config.toml).
    #[serde(default)]
    pub backup: BackupConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "MOBDB_";

impl Config {
    /// Builds a Figment that merges defaults, `config.toml` if present, and
    /// `MOBDB_`-prefixed environment variables (`__` separates tables, e.g.
    /// `MOBDB_SYNC__APP_PACKAGE`).
    pub fn figment() -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let figment = if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment.merge(Toml::file(DEFAULT_CONFIG_FILE))
        } else {
            figment
        };
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads and validates the configuration from all sources.
    pub fn load() -> Result<Self, MobdbError> {
        Self::from_figment(&Self::figment())
    }

    pub fn from_figment(figment: &Figment) -> Result<Self, MobdbError> {
        let cfg: Self = figment.extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), MobdbError> {
        if self.sync.interval_secs == 0 {
            return Err(MobdbError::Config(
                "sync.interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.sync.database_name.trim().is_empty() {
            return Err(MobdbError::Config(
                "sync.database_name must be set and non-empty".to_string(),
            ));
        }
        if self.backup.enabled && self.backup.max_count == 0 {
            return Err(MobdbError::Config(
                "backup.max_count must be at least 1 when backups are enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Local path of the mirrored database file.
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.sync.database_name)
    }

    pub fn replication(&self) -> ReplicationConfig {
        ReplicationConfig {
            app_package: self.sync.app_package.clone(),
            remote_path: self.sync.remote_path(),
            local_path: self.database_path(),
            sync_interval: Duration::from_secs(self.sync.interval_secs),
            backup_enabled: self.backup.enabled,
            backup_interval: Duration::from_secs(self.backup.interval_secs),
            backup_max_count: self.backup.max_count,
            backup_dir: self.backup.dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_toml(toml: &str) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::string(toml))
    }

    #[test]
    fn defaults_resolve_to_expected_replication_settings() {
        let cfg = Config::from_figment(&with_toml("")).unwrap();
        assert_eq!(cfg.basic.listen_port, 6969);

        let rep = cfg.replication();
        assert_eq!(rep.remote_path, "databases/app.db");
        assert_eq!(rep.local_path, PathBuf::from("app.db"));
        assert_eq!(rep.sync_interval, Duration::from_secs(5));
        assert!(rep.backup_enabled);
        assert_eq!(rep.backup_interval, Duration::from_secs(3600));
        assert_eq!(rep.backup_max_count, 24);
    }

    #[test]
    fn toml_tables_override_defaults() {
        let cfg = Config::from_figment(&with_toml(
            r#"
            [sync]
            app_package = "org.sample.notes"
            database_name = "notes.db"
            interval_secs = 30

            [backup]
            enabled = false
            "#,
        ))
        .unwrap();

        assert_eq!(cfg.sync.app_package, "org.sample.notes");
        assert_eq!(cfg.sync.remote_path(), "databases/notes.db");
        assert_eq!(cfg.sync.interval_secs, 30);
        assert!(!cfg.backup.enabled);
        assert_eq!(cfg.backup.max_count, 24);
    }

    #[test]
    fn zero_retention_is_rejected_only_when_backups_are_enabled() {
        let err = Config::from_figment(&with_toml("[backup]\nmax_count = 0")).unwrap_err();
        assert!(matches!(err, MobdbError::Config(_)));

        let cfg = Config::from_figment(&with_toml("[backup]\nmax_count = 0\nenabled = false"));
        assert!(cfg.is_ok());
    }

    #[test]
    fn zero_sync_interval_is_rejected() {
        let err = Config::from_figment(&with_toml("[sync]\ninterval_secs = 0")).unwrap_err();
        assert!(matches!(err, MobdbError::Config(_)));
    }
}
