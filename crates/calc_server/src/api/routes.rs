//! Route table and cross-cutting layers.

use crate::api::handlers;
use crate::state::AppState;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{delete, get};
use axum::Router;
use log::info;
use std::time::Instant;
use tower_http::cors::CorsLayer;

/// Base path of the history collection.
pub const HISTORY_PATH: &str = "/api/history";

/// Builds the history store router.
///
/// CORS is fully permissive so browser clients on any origin can call the API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            HISTORY_PATH,
            get(handlers::list_history)
                .post(handlers::create_history)
                .delete(handlers::clear_history),
        )
        .route(
            &format!("{HISTORY_PATH}/{{id}}"),
            delete(handlers::delete_history),
        )
        .layer(middleware::from_fn(log_request))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    info!(
        "event=http_request module=api method={method} path={path} status={} duration_ms={}",
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}
