//! Axum route handlers for the Workbench gateway API.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use workbench_core::WorkspaceId;
use workbench_sandbox::{FileEntry, SandboxError};

use crate::{error::GatewayError, state::AppState};

// ── Shared state ─────────────────────────────────────────────────────────────

type App = Arc<AppState>;

/// Request body ceiling. Uploads carry up to 100 MiB of content, and
/// base64 inflates that by 4/3 before JSON framing is added.
const MAX_BODY_BYTES: usize = 150 * 1024 * 1024;

// ── Request / response types ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UploadBody {
    pub filename: String,
    /// Base64-encoded file bytes.
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub workspace_id: WorkspaceId,
    pub filename: String,
    pub size: usize,
}

#[derive(Debug, Deserialize)]
pub struct ExecuteBody {
    pub workspace_id: String,
    pub binary: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub workspace_id: WorkspaceId,
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub workspace_id: WorkspaceId,
    pub filename: String,
    pub size: usize,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct BinariesResponse {
    pub binaries: Vec<String>,
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the application router with the given state.
pub fn create_router(state: App) -> Router {
    Router::new()
        .route("/upload", post(upload))
        .route("/execute", post(execute))
        .route("/list/{id}", get(list_files))
        .route("/download/{id}/{filename}", get(download))
        .route("/cleanup/{id}", delete(cleanup))
        .route("/binaries", get(list_binaries))
        .route("/health", get(health))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Parse an identifier before anything touches storage.
fn parse_id(raw: &str) -> Result<WorkspaceId, GatewayError> {
    Ok(WorkspaceId::parse(raw).map_err(SandboxError::from)?)
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `GET /health` — liveness probe.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}

/// `POST /upload` — create a workspace holding one uploaded file.
///
/// # Errors
/// Returns 400 for undecodable base64 or any field that fails
/// validation, 500 if the workspace cannot be written.
pub async fn upload(
    State(state): State<App>,
    Json(body): Json<UploadBody>,
) -> Result<impl IntoResponse, GatewayError> {
    let content = base64::engine::general_purpose::STANDARD
        .decode(&body.content)
        .map_err(|_| GatewayError::InvalidRequest("content is not valid base64".to_owned()))?;

    let id = state.store.create(&body.filename, &content).await?;
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            workspace_id: id,
            filename: body.filename,
            size: content.len(),
        }),
    ))
}

/// `POST /execute` — run a whitelisted binary inside a workspace.
///
/// # Errors
/// Returns 400 for a bad identifier, binary name, or argument list,
/// 404 for an unknown workspace, 403 for a whitelist escape, and 408
/// when the wall-clock budget expires.
pub async fn execute(
    State(state): State<App>,
    Json(body): Json<ExecuteBody>,
) -> Result<impl IntoResponse, GatewayError> {
    let id = parse_id(&body.workspace_id)?;
    let report = state.sandbox.run(id, &body.binary, &body.args).await?;
    Ok(Json(report))
}

/// `GET /list/{id}` — list workspace entries.
///
/// # Errors
/// Returns 400 for a malformed identifier, 404 for an unknown workspace.
pub async fn list_files(
    State(state): State<App>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let id = parse_id(&id)?;
    let files = state.files.list(id).await?;
    Ok(Json(ListResponse {
        workspace_id: id,
        files,
    }))
}

/// `GET /download/{id}/{filename}` — read one workspace file as text.
///
/// # Errors
/// Returns 400 for a malformed identifier, filename, or non-text file,
/// 404 if the workspace or file is absent, 403 for a containment
/// violation.
pub async fn download(
    State(state): State<App>,
    Path((id, filename)): Path<(String, String)>,
) -> Result<impl IntoResponse, GatewayError> {
    let id = parse_id(&id)?;
    let content = state.files.read(id, &filename).await?;
    Ok(Json(DownloadResponse {
        workspace_id: id,
        size: content.len(),
        filename,
        content,
    }))
}

/// `DELETE /cleanup/{id}` — destroy a workspace.
///
/// # Errors
/// Returns 400 for a malformed identifier, 404 if the workspace does
/// not exist (including a repeated cleanup).
pub async fn cleanup(
    State(state): State<App>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let id = parse_id(&id)?;
    state.store.destroy(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /binaries` — names of the binaries the service may execute.
///
/// # Errors
/// Returns 500 if the tool directory exists but cannot be enumerated.
pub async fn list_binaries(
    State(state): State<App>,
) -> Result<impl IntoResponse, GatewayError> {
    let binaries = state.sandbox.available().await?;
    Ok(Json(BinariesResponse { binaries }))
}
