use axum::extract::State;
use axum::Json;
use tracing::error;

use craftbell_core::dispatch::{DispatchOutcome, Dispatcher};
use craftbell_core::startup::TokioSleeper;
use craftbell_core::webhook::WebhookEnvelope;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /webhook — inbound chat-platform events
// ---------------------------------------------------------------------------

/// Handle one webhook delivery.
///
/// Always answers 200 with a JSON string body — the platform redelivers
/// on anything else, so even a malformed payload or an internal failure
/// is acknowledged, not rejected.
pub async fn receive_webhook(State(app): State<AppState>, body: String) -> Json<String> {
    let envelope: WebhookEnvelope = match serde_json::from_str(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            error!(error = %e, "unparseable webhook body");
            return Json(DispatchOutcome::ErrorAcknowledged.body().to_string());
        }
    };

    let sleeper = TokioSleeper;
    let dispatcher = Dispatcher::new(
        app.store.as_ref(),
        app.notifier.as_ref(),
        app.compute.as_ref(),
        &sleeper,
        &app.config,
    );
    let outcome = dispatcher.handle(&envelope).await;
    Json(outcome.body().to_string())
}

// ---------------------------------------------------------------------------
// GET /healthz
// ---------------------------------------------------------------------------

pub async fn healthz() -> &'static str {
    "ok"
}
