use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use shared::error::{ApiError, ErrorCode};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

mod catalog;
mod config;

use catalog::DocsCatalog;
use config::{load_settings, prepare_docs_dir};

struct AppState {
    catalog: DocsCatalog,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let docs_dir = prepare_docs_dir(&settings.docs_dir)?;
    let catalog = DocsCatalog::load(&docs_dir).map_err(|error| {
        error!(
            docs_dir = %docs_dir.display(),
            %error,
            "failed to load docs catalog; point docs_dir at a built documentation tree"
        );
        error
    })?;
    info!(
        services = catalog.service_count(),
        docs_dir = %docs_dir.display(),
        "docs catalog loaded"
    );

    let state = AppState { catalog };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.bind.parse()?;
    info!(%addr, "docs server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/docs/v1", get(docs_index))
        .route("/docs/v1/", get(docs_index))
        .route("/docs/v1/*path", get(docs_service))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// The full service index, exactly as read from disk.
async fn docs_index(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(state.catalog.index().clone())
}

async fn docs_service(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ApiError>)> {
    match state.catalog.lookup(&path) {
        Some(entry) => Ok(Json(entry.clone())),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError::new(
                ErrorCode::NotFound,
                format!("no documentation for service path '/{path}'"),
            )),
        )),
    }
}
