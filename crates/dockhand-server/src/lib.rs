//! HTTP and WebSocket front for dockhand
//!
//! Exposes the container controller and the file sync engine as JSON
//! routes, with the two streaming file calls carried over WebSockets.

pub mod error;
pub mod handlers;
pub mod state;
mod stream;
pub mod types;

pub use error::{ApiError, ServerError};
pub use state::AppState;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Largest JSON request body accepted by the unary routes.
///
/// Leaves room for a 4 MiB file once base64 and JSON framing are added.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Build the router for every route the service exposes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/containers", get(handlers::container::list))
        .route("/v1/containers/start", post(handlers::container::start))
        .route("/v1/containers/stop", post(handlers::container::stop))
        .route("/v1/containers/get", post(handlers::container::get))
        .route("/v1/files/send", post(handlers::files::send))
        .route("/v1/files/compare", post(handlers::files::compare))
        .route("/v1/files/send/stream", get(handlers::files::send_stream))
        .route("/v1/files/compare/stream", get(handlers::files::compare_stream))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the listening socket
pub async fn bind(addr: &str) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })
}

/// Serve until `shutdown` resolves, then drain in-flight requests
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!("dockhand listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
