//! Direct subprocess backend.
//!
//! Each child runs in its own process group so that timeout termination
//! reaches every descendant, not only the process we spawned.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::{ExecBackend, LaunchSpec, RawOutput};
use crate::SandboxError;

/// Runs programs as ordinary child processes on the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessBackend;

impl ProcessBackend {
    /// Create the backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ExecBackend for ProcessBackend {
    async fn run(&self, spec: &LaunchSpec, timeout: Duration) -> Result<RawOutput, SandboxError> {
        let mut command = tokio::process::Command::new(&spec.program);
        command
            .args(&spec.args)
            .current_dir(&spec.workdir)
            .env_clear()
            .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .process_group(0)
            .kill_on_drop(true);

        let child = command.spawn()?;
        let pid = child.id();

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(RawOutput {
                exit_code: output.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }),
            Ok(Err(e)) => Err(e.into()),
            Err(_elapsed) => {
                // Dropping the wait future kills the direct child via
                // kill_on_drop; the group signal takes out descendants.
                if let Some(pid) = pid {
                    kill_group(pid);
                }
                tracing::warn!(
                    program = %spec.program.display(),
                    limit_secs = timeout.as_secs(),
                    "execution timed out, process group killed"
                );
                Err(SandboxError::TimedOut {
                    limit_secs: timeout.as_secs(),
                })
            }
        }
    }
}

/// SIGKILL an entire process group.
///
/// The child was spawned with `process_group(0)`, so its pid doubles as
/// the pgid. A stale pid at worst signals a group that no longer exists,
/// which kill(2) reports as `ESRCH`.
#[allow(clippy::cast_possible_wrap)]
fn kill_group(pid: u32) {
    // SAFETY: plain syscall with no pointer arguments.
    let _ = unsafe { libc::kill(-(pid as i32), libc::SIGKILL) };
}
