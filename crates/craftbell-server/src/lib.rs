pub mod compute;
pub mod line;
pub mod routes;
pub mod state;
pub mod store;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the axum Router with all routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(routes::webhook::receive_webhook))
        .route("/healthz", get(routes::webhook::healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Start the webhook server.
pub async fn serve(app_state: AppState, port: u16) -> anyhow::Result<()> {
    let app = build_router(app_state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("craftbell webhook server listening on http://localhost:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}
