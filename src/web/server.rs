use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::cache::SnapshotCache;

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<dyn SnapshotCache>,
}

pub async fn run_server(bind: &str, cache: Arc<dyn SnapshotCache>) -> std::io::Result<()> {
    let state = AppState { cache };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/v1/satellites", get(list_satellites))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    log::info!("Starting read API on {}", bind);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, app).await
}

/// Serves the worker's cached fleet snapshot verbatim. The cache document is
/// already the wire format, so no re-encoding happens here.
async fn list_satellites(State(state): State<AppState>) -> impl IntoResponse {
    match state.cache.fetch().await {
        Ok(Some(json)) => ([(header::CONTENT_TYPE, "application/json")], json).into_response(),
        Ok(None) => {
            (StatusCode::SERVICE_UNAVAILABLE, "no fleet snapshot available").into_response()
        }
        Err(e) => {
            log::error!("cache read failed: {e}");
            (StatusCode::SERVICE_UNAVAILABLE, "cache unavailable").into_response()
        }
    }
}
