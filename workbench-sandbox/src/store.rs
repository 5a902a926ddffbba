//! Workspace lifecycle: UUID-addressed directories under one fixed root.
//!
//! A workspace path is always `work_dir / <canonical id>` — never built
//! from unsanitized input. Creation is exclusive, destruction re-checks
//! containment, and a failed creation rolls back so the workspace never
//! becomes visible half-made.

use std::path::PathBuf;

use workbench_core::{validate, WorkspaceId};

use crate::paths::confine;
use crate::{SandboxConfig, SandboxError};

/// Filesystem-backed workspace registry.
///
/// Holds no in-memory state: the directory tree is the source of truth,
/// so operations need no cross-request locking. A concurrent execute and
/// destroy against the same identifier is a caller-visible race by
/// design.
#[derive(Debug, Clone)]
pub struct WorkspaceStore {
    work_dir: PathBuf,
    max_upload_bytes: u64,
}

impl WorkspaceStore {
    /// Create a store rooted at the configured workspace directory.
    #[must_use]
    pub fn new(config: &SandboxConfig) -> Self {
        Self {
            work_dir: config.work_dir.clone(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    /// The directory backing a workspace id.
    fn workspace_path(&self, id: WorkspaceId) -> PathBuf {
        self.work_dir.join(id.to_string())
    }

    /// Create a workspace holding one initial file.
    ///
    /// Every validator runs before the filesystem is touched. The
    /// directory is created with must-not-exist semantics, so a residual
    /// UUID collision surfaces as an error instead of a silent overwrite.
    ///
    /// # Errors
    /// Returns [`SandboxError::Validation`] for a bad filename, oversized
    /// content, or non-UTF-8 content; [`SandboxError::Io`] if the
    /// directory or file cannot be written (the directory is rolled back
    /// first).
    pub async fn create(
        &self,
        filename: &str,
        content: &[u8],
    ) -> Result<WorkspaceId, SandboxError> {
        validate::upload_filename(filename)?;
        validate::content_size(content.len(), self.max_upload_bytes)?;
        validate::content(content)?;

        let id = WorkspaceId::new();
        let dir = self.workspace_path(id);
        tokio::fs::create_dir(&dir).await?;

        if let Err(e) = tokio::fs::write(dir.join(filename), content).await {
            // Best-effort rollback; the workspace never becomes visible.
            let _ = tokio::fs::remove_dir_all(&dir).await;
            tracing::error!(workspace = %id, error = %e, "initial file write failed, rolled back");
            return Err(e.into());
        }

        tracing::info!(
            workspace = %id,
            file = filename,
            bytes = content.len(),
            "workspace created"
        );
        Ok(id)
    }

    /// Resolve an id to its backing directory.
    ///
    /// # Errors
    /// Returns [`SandboxError::WorkspaceNotFound`] unless the directory
    /// exists.
    pub async fn resolve(&self, id: WorkspaceId) -> Result<PathBuf, SandboxError> {
        let dir = self.workspace_path(id);
        match tokio::fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(dir),
            _ => Err(SandboxError::WorkspaceNotFound(id)),
        }
    }

    /// Destroy a workspace and everything in it.
    ///
    /// Containment is re-checked immediately before deletion, guarding
    /// against the directory being swapped for a symlink between resolve
    /// and delete.
    ///
    /// # Errors
    /// Returns [`SandboxError::WorkspaceNotFound`] if the workspace does
    /// not exist (destroying twice fails the second time),
    /// [`SandboxError::Escape`] if the resolved path left the root, or
    /// [`SandboxError::Io`] if removal fails.
    pub async fn destroy(&self, id: WorkspaceId) -> Result<(), SandboxError> {
        let dir = self.resolve(id).await?;
        let resolved = confine(&dir, &self.work_dir, "workspace").await?;
        tokio::fs::remove_dir_all(&resolved).await?;
        tracing::info!(workspace = %id, "workspace destroyed");
        Ok(())
    }
}
