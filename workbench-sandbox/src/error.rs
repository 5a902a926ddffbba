//! Error types for the sandbox crate.

use workbench_core::{ValidationError, WorkspaceId};

/// Errors that can occur during workspace, file, or execution operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SandboxError {
    /// An input field failed validation before anything was touched.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No workspace directory exists for the given identifier.
    #[error("workspace not found: {0}")]
    WorkspaceNotFound(WorkspaceId),

    /// The named file does not exist inside the workspace.
    #[error("file not found: {name}")]
    FileNotFound { name: String },

    /// The requested binary is absent from the tool directory, is not a
    /// regular file, or is not executable.
    #[error("binary '{name}' rejected: {reason}")]
    Binary { name: String, reason: &'static str },

    /// A resolved path left its required ancestor directory.
    ///
    /// The message is deliberately fixed; the offending path never
    /// reaches the caller.
    #[error("access denied")]
    Escape { what: &'static str },

    /// Execution exceeded the wall-clock budget. Partial output captured
    /// before expiry is discarded.
    #[error("execution timed out after {limit_secs} s")]
    TimedOut { limit_secs: u64 },

    /// A file's bytes are not valid UTF-8 text.
    #[error("file '{name}' is not valid UTF-8 text")]
    NotText { name: String },

    /// Underlying I/O failure outside caller control: disk full,
    /// permission, directory collision. The gateway reports these with a
    /// coarse message; the detail stays in the log.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
