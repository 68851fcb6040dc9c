use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use shared::{
    error::{ApiError, ApiException},
    protocol::CreatedKey,
};
use tracing::{error, info};

mod app_state;
mod config;
mod documents;

use app_state::AppState;
use config::{load_settings, read_seed};
use documents::DocumentStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let documents = DocumentStore::new();
    if let Some(seed_path) = settings.seed_path.as_deref() {
        let seed = read_seed(seed_path).map_err(|error| {
            error!(%seed_path, %error, "failed to load seed documents");
            error
        })?;
        let loaded = documents.seed(seed).await?;
        info!(%seed_path, loaded, "seeded document store");
    }

    let app = build_router(Arc::new(AppState { documents }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "document store listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/:document", get(read_collection).post(push_document))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn read_collection(
    State(state): State<Arc<AppState>>,
    Path(document): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<ApiError>)> {
    let collection = collection_name(&document).map_err(api_error)?;
    Ok(Json(state.documents.list(collection).await))
}

async fn push_document(
    State(state): State<Arc<AppState>>,
    Path(document): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<CreatedKey>, (StatusCode, Json<ApiError>)> {
    let collection = collection_name(&document).map_err(api_error)?;
    let key = state
        .documents
        .push(collection, body)
        .await
        .map_err(api_error)?;
    info!(%collection, %key, "stored document");
    Ok(Json(CreatedKey { name: key }))
}

fn collection_name(document: &str) -> Result<&str, ApiException> {
    document
        .strip_suffix(".json")
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiException::unknown_document(document))
}

fn api_error(err: ApiException) -> (StatusCode, Json<ApiError>) {
    let status = StatusCode::from_u16(err.code.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ApiError::from(err)))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
