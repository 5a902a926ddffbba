//! Entry point for the `workbench-gateway` HTTP server.

use std::sync::Arc;

use tracing::info;

use workbench_gateway::{routes::create_router, state::AppState};
use workbench_sandbox::SandboxConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let addr = std::env::var("WORKBENCH_LISTEN_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8889".to_owned());

    let config = SandboxConfig::from_env();
    if let Err(e) = config.bootstrap().await {
        tracing::error!(error = %e, "failed to prepare the workspace root");
        std::process::exit(1);
    }

    let state = Arc::new(AppState::new(&config));
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(
        addr = %addr,
        work_dir = %config.work_dir.display(),
        bin_dir = %config.bin_dir.display(),
        "workbench-gateway listening"
    );

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
