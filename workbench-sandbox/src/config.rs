//! Service configuration: the two fixed directories and the fixed limits.

use std::path::PathBuf;
use std::time::Duration;

use workbench_core::validate::MAX_UPLOAD_BYTES;

use crate::SandboxError;

/// Default workspace root when `WORKBENCH_WORK_DIR` is unset.
const DEFAULT_WORK_DIR: &str = "/srv/workbench/work";

/// Default tool directory when `WORKBENCH_BIN_DIR` is unset.
const DEFAULT_BIN_DIR: &str = "/srv/workbench/bin";

/// Default execution wall-clock budget: 5 minutes.
const DEFAULT_EXEC_TIMEOUT: Duration = Duration::from_secs(300);

/// Configuration for the sandbox layer.
///
/// `work_dir` and `bin_dir` are the two fixed, disjoint absolute
/// directories the whole service operates on: every workspace lives
/// directly under `work_dir`, and `bin_dir` holds the only binaries the
/// service may execute. The tool directory is read-only from the
/// service's point of view and is never created or mutated here.
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    /// Root directory containing one subdirectory per workspace.
    pub work_dir: PathBuf,

    /// Directory whose executable entries form the binary whitelist.
    pub bin_dir: PathBuf,

    /// Upload size ceiling in bytes.
    pub max_upload_bytes: u64,

    /// Wall-clock budget for a single execution.
    pub exec_timeout: Duration,
}

impl SandboxConfig {
    /// Create a config with the given directories and default limits.
    #[must_use]
    pub fn new(work_dir: PathBuf, bin_dir: PathBuf) -> Self {
        Self {
            work_dir,
            bin_dir,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            exec_timeout: DEFAULT_EXEC_TIMEOUT,
        }
    }

    /// Create a config from `WORKBENCH_WORK_DIR` / `WORKBENCH_BIN_DIR`,
    /// falling back to the built-in defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORKBENCH_WORK_DIR")
            .map_or_else(|_| PathBuf::from(DEFAULT_WORK_DIR), PathBuf::from);
        let bin_dir = std::env::var("WORKBENCH_BIN_DIR")
            .map_or_else(|_| PathBuf::from(DEFAULT_BIN_DIR), PathBuf::from);
        Self::new(work_dir, bin_dir)
    }

    /// Create the workspace root if it does not exist yet.
    ///
    /// Called once at startup. The tool directory is intentionally left
    /// alone; a missing tool directory just means an empty whitelist.
    ///
    /// # Errors
    /// Returns [`SandboxError::Io`] if the directory cannot be created.
    pub async fn bootstrap(&self) -> Result<(), SandboxError> {
        tokio::fs::create_dir_all(&self.work_dir).await?;
        tracing::info!(work_dir = %self.work_dir.display(), "workspace root ready");
        Ok(())
    }
}
