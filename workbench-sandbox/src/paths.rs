//! Containment checks: resolve symlinks, then require an ancestor.
//!
//! Canonicalize-then-compare is racy against concurrent symlink swaps
//! (time-of-check vs. time-of-use), which is why callers re-apply the
//! check immediately before the sensitive operation rather than once at
//! resolve time.

use std::path::{Path, PathBuf};

use crate::SandboxError;

/// Resolve `candidate` and require that it still lies under `root`.
///
/// Both paths are canonicalized, so a symlink planted anywhere along
/// `candidate` cannot point the operation outside `root`.
///
/// # Errors
/// Returns [`SandboxError::Escape`] (tagged with `what` for the log) if
/// the resolved path leaves `root`, and [`SandboxError::Io`] if either
/// path cannot be resolved.
pub(crate) async fn confine(
    candidate: &Path,
    root: &Path,
    what: &'static str,
) -> Result<PathBuf, SandboxError> {
    let resolved_root = tokio::fs::canonicalize(root).await?;
    let resolved = tokio::fs::canonicalize(candidate).await?;
    if !resolved.starts_with(&resolved_root) {
        tracing::warn!(what, "containment check refused a resolved path");
        return Err(SandboxError::Escape { what });
    }
    Ok(resolved)
}
