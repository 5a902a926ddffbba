//! Confined execution of whitelisted binaries.
//!
//! The runner validates the binary name and argument list, resolves the
//! binary strictly as a base name inside the one fixed tool directory,
//! and hands a fully scrubbed launch description to the backend. A
//! caller-supplied path can never reach the spawn: the name validator
//! admits no separator, and lookup never consults a search path.

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;

use workbench_core::{validate, WorkspaceId};

use crate::backend::{ExecBackend, LaunchSpec};
use crate::paths::confine;
use crate::store::WorkspaceStore;
use crate::{SandboxConfig, SandboxError};

/// Locale handed to every child. Nothing else of the host locale
/// configuration survives the environment scrub.
const CHILD_LANG: &str = "C.UTF-8";

/// Outcome of one confined execution.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct ExecutionReport {
    /// The workspace the child ran in.
    pub workspace_id: WorkspaceId,
    /// Base name of the executed binary.
    pub binary: String,
    /// Child exit code; `-1` if terminated by a signal.
    pub exit_code: i32,
    /// Full captured standard output.
    pub stdout: String,
    /// Full captured standard error.
    pub stderr: String,
    /// When execution began.
    pub started_at: DateTime<Utc>,
    /// Wall-clock elapsed milliseconds.
    pub duration_ms: u128,
}

/// Executes whitelisted binaries confined to a workspace.
pub struct Sandbox<B: ExecBackend> {
    backend: B,
    store: WorkspaceStore,
    bin_dir: PathBuf,
    timeout: Duration,
}

impl<B: ExecBackend> Sandbox<B> {
    /// Create a sandbox over the given backend and workspace store.
    #[must_use]
    pub fn new(backend: B, store: WorkspaceStore, config: &SandboxConfig) -> Self {
        Self {
            backend,
            store,
            bin_dir: config.bin_dir.clone(),
            timeout: config.exec_timeout,
        }
    }

    /// Run a whitelisted binary inside a workspace.
    ///
    /// Validation completes in full before the workspace or tool
    /// directory is consulted; nothing is spawned for malformed input.
    ///
    /// # Errors
    /// Returns [`SandboxError::Validation`] for a bad binary name or
    /// argument list, [`SandboxError::WorkspaceNotFound`] if the
    /// workspace is absent, [`SandboxError::Binary`] /
    /// [`SandboxError::Escape`] for whitelist violations, and
    /// [`SandboxError::TimedOut`] when the wall-clock budget expires.
    pub async fn run(
        &self,
        id: WorkspaceId,
        binary: &str,
        args: &[String],
    ) -> Result<ExecutionReport, SandboxError> {
        validate::binary_name(binary)?;
        validate::arguments(args)?;

        let workspace = self.store.resolve(id).await?;
        let program = self.resolve_binary(binary).await?;

        let spec = LaunchSpec {
            program,
            args: args.to_vec(),
            workdir: workspace.clone(),
            env: vec![
                ("PATH".to_owned(), self.bin_dir.display().to_string()),
                ("HOME".to_owned(), workspace.display().to_string()),
                ("LANG".to_owned(), CHILD_LANG.to_owned()),
            ],
        };

        let started_at = Utc::now();
        let wall = Instant::now();

        tracing::info!(workspace = %id, binary, "starting execution");
        let output = self.backend.run(&spec, self.timeout).await?;
        let duration = wall.elapsed();

        tracing::info!(
            workspace = %id,
            binary,
            exit_code = output.exit_code,
            elapsed_ms = duration.as_millis(),
            "execution complete"
        );

        Ok(ExecutionReport {
            workspace_id: id,
            binary: binary.to_owned(),
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
            started_at,
            duration_ms: duration.as_millis(),
        })
    }

    /// Resolve a validated base name against the tool directory.
    ///
    /// The candidate must exist, be a regular file, carry an execute
    /// bit, and still lie inside the tool directory after symlink
    /// resolution — a planted symlink cannot widen the whitelist.
    async fn resolve_binary(&self, name: &str) -> Result<PathBuf, SandboxError> {
        let candidate = self.bin_dir.join(name);
        let Ok(meta) = tokio::fs::metadata(&candidate).await else {
            return Err(SandboxError::Binary {
                name: name.to_owned(),
                reason: "not present in the tool directory",
            });
        };
        if !meta.is_file() {
            return Err(SandboxError::Binary {
                name: name.to_owned(),
                reason: "not a regular file",
            });
        }
        if meta.permissions().mode() & 0o111 == 0 {
            return Err(SandboxError::Binary {
                name: name.to_owned(),
                reason: "not executable",
            });
        }
        confine(&candidate, &self.bin_dir, "binary").await
    }

    /// Sorted names of the binaries the service may execute.
    ///
    /// A missing tool directory yields an empty whitelist, not an error.
    ///
    /// # Errors
    /// Returns [`SandboxError::Io`] if the directory exists but cannot
    /// be enumerated.
    pub async fn available(&self) -> Result<Vec<String>, SandboxError> {
        let mut names = Vec::new();
        let Ok(mut entries) = tokio::fs::read_dir(&self.bin_dir).await else {
            return Ok(names);
        };
        while let Some(entry) = entries.next_entry().await? {
            let Ok(meta) = tokio::fs::metadata(entry.path()).await else {
                continue;
            };
            if !meta.is_file() || meta.permissions().mode() & 0o111 == 0 {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::backend::RawOutput;

    /// Records the launch it was asked to perform.
    #[derive(Default)]
    struct RecordingBackend {
        seen: Mutex<Option<LaunchSpec>>,
    }

    #[async_trait]
    impl ExecBackend for RecordingBackend {
        async fn run(
            &self,
            spec: &LaunchSpec,
            _timeout: Duration,
        ) -> Result<RawOutput, SandboxError> {
            *self.seen.lock().expect("seen lock") = Some(spec.clone());
            Ok(RawOutput {
                exit_code: 0,
                stdout: "ok\n".to_owned(),
                stderr: String::new(),
            })
        }
    }

    /// Fails the test if the backend is ever reached.
    struct UnreachableBackend;

    #[async_trait]
    impl ExecBackend for UnreachableBackend {
        async fn run(
            &self,
            _spec: &LaunchSpec,
            _timeout: Duration,
        ) -> Result<RawOutput, SandboxError> {
            panic!("backend must not be reached for rejected input");
        }
    }

    struct Fixture {
        _tmp: tempfile::TempDir,
        config: SandboxConfig,
        store: WorkspaceStore,
    }

    fn fixture() -> Fixture {
        let tmp = match tempfile::tempdir() {
            Ok(t) => t,
            Err(e) => panic!("tempdir failed: {e}"),
        };
        let work = tmp.path().join("work");
        let bin = tmp.path().join("bin");
        std::fs::create_dir_all(&work).expect("create work dir");
        std::fs::create_dir_all(&bin).expect("create bin dir");
        let config = SandboxConfig::new(work, bin);
        let store = WorkspaceStore::new(&config);
        Fixture {
            _tmp: tmp,
            config,
            store,
        }
    }

    fn install_tool(config: &SandboxConfig, name: &str, mode: u32) {
        let path = config.bin_dir.join(name);
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").expect("write tool");
        let mut perms = std::fs::metadata(&path).expect("tool metadata").permissions();
        perms.set_mode(mode);
        std::fs::set_permissions(&path, perms).expect("chmod tool");
    }

    #[tokio::test]
    async fn rejects_binary_names_with_separators_before_any_io() {
        let fx = fixture();
        let sandbox = Sandbox::new(UnreachableBackend, fx.store.clone(), &fx.config);
        let result = sandbox
            .run(WorkspaceId::new(), "../../bin/freq", &[])
            .await;
        assert!(matches!(result, Err(SandboxError::Validation(_))));
    }

    #[tokio::test]
    async fn rejects_metacharacter_arguments_before_any_io() {
        let fx = fixture();
        let sandbox = Sandbox::new(UnreachableBackend, fx.store.clone(), &fx.config);
        let args = vec!["chip.cha; rm -rf /".to_owned()];
        let result = sandbox.run(WorkspaceId::new(), "freq", &args).await;
        assert!(matches!(result, Err(SandboxError::Validation(_))));
    }

    #[tokio::test]
    async fn unknown_workspace_is_not_found() {
        let fx = fixture();
        install_tool(&fx.config, "freq", 0o755);
        let sandbox = Sandbox::new(UnreachableBackend, fx.store.clone(), &fx.config);
        let result = sandbox.run(WorkspaceId::new(), "freq", &[]).await;
        assert!(matches!(result, Err(SandboxError::WorkspaceNotFound(_))));
    }

    #[tokio::test]
    async fn launch_is_scrubbed_and_pinned() {
        let fx = fixture();
        install_tool(&fx.config, "freq", 0o755);
        let id = match fx.store.create("chip.cha", b"a b c").await {
            Ok(id) => id,
            Err(e) => panic!("create failed: {e}"),
        };

        let backend = RecordingBackend::default();
        let sandbox = Sandbox::new(backend, fx.store.clone(), &fx.config);
        let args = vec!["chip.cha".to_owned()];
        let report = match sandbox.run(id, "freq", &args).await {
            Ok(r) => r,
            Err(e) => panic!("run failed: {e}"),
        };
        assert_eq!(report.exit_code, 0);
        assert_eq!(report.binary, "freq");
        assert_eq!(report.workspace_id, id);

        let seen = sandbox.backend.seen.lock().expect("seen lock").clone();
        let spec = match seen {
            Some(s) => s,
            None => panic!("backend was never called"),
        };
        assert_eq!(
            spec.program.file_name().and_then(|n| n.to_str()),
            Some("freq"),
            "program must be the resolved whitelisted tool"
        );
        assert_eq!(spec.args, args);
        assert_eq!(spec.workdir, fx.store.resolve(id).await.expect("resolve"));

        let keys: Vec<&str> = spec.env.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["PATH", "HOME", "LANG"], "exactly three scrubbed variables");
        assert_eq!(spec.env[2].1, "C.UTF-8");
    }

    #[tokio::test]
    async fn absent_binary_is_rejected() {
        let fx = fixture();
        let sandbox = Sandbox::new(UnreachableBackend, fx.store.clone(), &fx.config);
        let id = match fx.store.create("chip.cha", b"x").await {
            Ok(id) => id,
            Err(e) => panic!("create failed: {e}"),
        };
        let result = sandbox.run(id, "ghost", &[]).await;
        assert!(matches!(
            result,
            Err(SandboxError::Binary { reason: "not present in the tool directory", .. })
        ));
    }

    #[tokio::test]
    async fn non_executable_binary_is_rejected() {
        let fx = fixture();
        install_tool(&fx.config, "blunt", 0o644);
        let sandbox = Sandbox::new(UnreachableBackend, fx.store.clone(), &fx.config);
        let id = match fx.store.create("chip.cha", b"x").await {
            Ok(id) => id,
            Err(e) => panic!("create failed: {e}"),
        };
        let result = sandbox.run(id, "blunt", &[]).await;
        assert!(matches!(
            result,
            Err(SandboxError::Binary { reason: "not executable", .. })
        ));
    }

    #[tokio::test]
    async fn symlink_out_of_the_tool_dir_is_refused() {
        let fx = fixture();
        let link = fx.config.bin_dir.join("impostor");
        std::os::unix::fs::symlink("/bin/sh", &link).expect("symlink");
        let sandbox = Sandbox::new(UnreachableBackend, fx.store.clone(), &fx.config);
        let id = match fx.store.create("chip.cha", b"x").await {
            Ok(id) => id,
            Err(e) => panic!("create failed: {e}"),
        };
        let result = sandbox.run(id, "impostor", &[]).await;
        assert!(
            matches!(result, Err(SandboxError::Escape { .. })),
            "whitelist escape via symlink must be refused, got {result:?}"
        );
    }

    #[tokio::test]
    async fn available_lists_only_executable_regular_files() {
        let fx = fixture();
        install_tool(&fx.config, "freq", 0o755);
        install_tool(&fx.config, "sort_lines", 0o755);
        install_tool(&fx.config, "notes", 0o644);
        std::fs::create_dir(fx.config.bin_dir.join("subdir")).expect("subdir");

        let sandbox = Sandbox::new(UnreachableBackend, fx.store.clone(), &fx.config);
        let names = match sandbox.available().await {
            Ok(n) => n,
            Err(e) => panic!("available failed: {e}"),
        };
        assert_eq!(names, ["freq", "sort_lines"], "sorted, executables only");
    }

    #[tokio::test]
    async fn missing_tool_dir_means_empty_whitelist() {
        let fx = fixture();
        std::fs::remove_dir(&fx.config.bin_dir).expect("remove bin dir");
        let sandbox = Sandbox::new(UnreachableBackend, fx.store.clone(), &fx.config);
        let names = match sandbox.available().await {
            Ok(n) => n,
            Err(e) => panic!("available failed: {e}"),
        };
        assert!(names.is_empty());
    }
}
