use crate::error::MobdbError;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

/// Fetches the full remote copy of the database file.
#[async_trait]
pub trait Puller: Send + Sync {
    async fn pull(&self, app_package: &str, remote_path: &str) -> Result<Vec<u8>, MobdbError>;
}

/// Reads the file out of the app's private storage over `adb`.
#[derive(Debug, Clone)]
pub struct AdbPuller {
    adb_path: PathBuf,
}

impl AdbPuller {
    pub fn new(adb_path: impl Into<PathBuf>) -> Self {
        Self {
            adb_path: adb_path.into(),
        }
    }
}

#[async_trait]
impl Puller for AdbPuller {
    async fn pull(&self, app_package: &str, remote_path: &str) -> Result<Vec<u8>, MobdbError> {
        // exec-out keeps stdout binary-clean, unlike `adb shell`.
        let output = Command::new(&self.adb_path)
            .args(["exec-out", "run-as", app_package, "cat", remote_path])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                MobdbError::RemoteFetch(format!(
                    "failed to run {}: {e}",
                    self.adb_path.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() {
                stdout.trim()
            } else {
                stderr.trim()
            };
            return Err(MobdbError::RemoteFetch(format!(
                "adb exited with {}: {detail}",
                output.status
            )));
        }

        debug!(
            app_package,
            remote_path,
            bytes = output.stdout.len(),
            "adb pull completed"
        );
        Ok(output.stdout)
    }
}
