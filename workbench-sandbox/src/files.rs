//! Read-side access to workspace files.
//!
//! The same filename discipline as upload applies here (charset, no
//! separators, no parent references — the extension rule is not
//! re-checked), and every read re-verifies that the resolved path still
//! lies inside the workspace. A symlink created by an executed binary
//! cannot leak foreign content.

use serde::Serialize;

use workbench_core::{validate, WorkspaceId};

use crate::paths::confine;
use crate::store::WorkspaceStore;
use crate::SandboxError;

/// One directory entry inside a workspace.
#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    /// Entry name, a single path component.
    pub name: String,
    /// Size in bytes; present for regular files only.
    pub size: Option<u64>,
    /// Whether the entry is a file or a directory.
    pub kind: FileKind,
}

/// Directory entry classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Directory,
}

/// Lists and reads files inside workspaces.
#[derive(Debug, Clone)]
pub struct FileAccessor {
    store: WorkspaceStore,
}

impl FileAccessor {
    /// Create an accessor over the given store.
    #[must_use]
    pub fn new(store: WorkspaceStore) -> Self {
        Self { store }
    }

    /// List workspace entries. Ordering is unspecified.
    ///
    /// # Errors
    /// Returns [`SandboxError::WorkspaceNotFound`] if the workspace is
    /// absent, [`SandboxError::Io`] if enumeration fails.
    pub async fn list(&self, id: WorkspaceId) -> Result<Vec<FileEntry>, SandboxError> {
        let dir = self.store.resolve(id).await?;
        let mut entries = tokio::fs::read_dir(&dir).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let meta = entry.metadata().await?;
            let kind = if meta.is_dir() {
                FileKind::Directory
            } else {
                FileKind::File
            };
            files.push(FileEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: meta.is_file().then_some(meta.len()),
                kind,
            });
        }
        Ok(files)
    }

    /// Read one workspace file as UTF-8 text.
    ///
    /// # Errors
    /// Returns [`SandboxError::Validation`] for a bad name,
    /// [`SandboxError::FileNotFound`] if no regular file by that name
    /// exists, [`SandboxError::Escape`] if the resolved path leaves the
    /// workspace, and [`SandboxError::NotText`] for non-UTF-8 bytes.
    pub async fn read(&self, id: WorkspaceId, name: &str) -> Result<String, SandboxError> {
        validate::file_name(name)?;
        let dir = self.store.resolve(id).await?;
        let candidate = dir.join(name);

        let Ok(meta) = tokio::fs::metadata(&candidate).await else {
            return Err(SandboxError::FileNotFound {
                name: name.to_owned(),
            });
        };
        if !meta.is_file() {
            return Err(SandboxError::FileNotFound {
                name: name.to_owned(),
            });
        }

        let resolved = confine(&candidate, &dir, "file").await?;
        let bytes = tokio::fs::read(&resolved).await?;
        String::from_utf8(bytes).map_err(|_| SandboxError::NotText {
            name: name.to_owned(),
        })
    }
}
