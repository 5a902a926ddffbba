//! Shared application state: the sandbox components wired to one config.

use workbench_sandbox::{FileAccessor, ProcessBackend, Sandbox, SandboxConfig, WorkspaceStore};

/// Everything the handlers need, built once at startup.
pub struct AppState {
    /// Workspace lifecycle operations.
    pub store: WorkspaceStore,
    /// Confined execution of whitelisted binaries.
    pub sandbox: Sandbox<ProcessBackend>,
    /// Read-side file access.
    pub files: FileAccessor,
}

impl AppState {
    /// Wire the sandbox components to the given configuration.
    #[must_use]
    pub fn new(config: &SandboxConfig) -> Self {
        let store = WorkspaceStore::new(config);
        let sandbox = Sandbox::new(ProcessBackend::new(), store.clone(), config);
        let files = FileAccessor::new(store.clone());
        Self {
            store,
            sandbox,
            files,
        }
    }
}
