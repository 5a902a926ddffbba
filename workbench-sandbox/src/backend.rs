//! Execution backend abstraction.
//!
//! Separates the decision of *what* to launch (validated and resolved by
//! the sandbox runner) from *how* it is launched, so the spawn mechanism
//! can be swapped or mocked without touching validation or containment.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::SandboxError;

/// Everything needed to launch one confined child process.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    /// Absolute path of the resolved, whitelisted program.
    pub program: PathBuf,

    /// Arguments, passed exactly as given. No shell ever interprets them.
    pub args: Vec<String>,

    /// Working directory for the child; pinned to the workspace.
    pub workdir: PathBuf,

    /// The complete child environment. Nothing else is inherited.
    pub env: Vec<(String, String)>,
}

/// Captured output of a completed execution.
#[derive(Debug, Clone)]
pub struct RawOutput {
    /// Child exit code; `-1` if terminated by a signal.
    pub exit_code: i32,

    /// Full standard output as text.
    pub stdout: String,

    /// Full standard error as text, captured separately.
    pub stderr: String,
}

/// Launches confined child processes.
///
/// Implementations must be `Send + Sync`. The contract: the program is
/// launched directly with no intermediating shell, the environment is
/// replaced rather than extended, and timeout expiry terminates the
/// child together with every descendant it spawned.
#[async_trait]
pub trait ExecBackend: Send + Sync {
    /// Run the program to completion or until the timeout expires.
    ///
    /// # Errors
    /// Returns [`SandboxError::TimedOut`] on budget expiry (any partial
    /// output is discarded) or [`SandboxError::Io`] if the child cannot
    /// be spawned or its output cannot be collected.
    async fn run(&self, spec: &LaunchSpec, timeout: Duration) -> Result<RawOutput, SandboxError>;
}
