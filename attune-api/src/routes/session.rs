//! Recommendation session endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use attune_core::PreferenceSet;

use crate::AppState;

/// Body for quantity updates
#[derive(Debug, Deserialize)]
pub struct QuantityUpdate {
    /// Requested batch size
    pub quantity: usize,
}

/// Create session routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/session", get(get_session))
        .route("/session/fetch", post(fetch))
        .route("/session/regenerate", post(regenerate))
        .route("/session/quantity", put(update_quantity))
}

/// GET /api/session - Current session state
async fn get_session(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.session.snapshot())
}

/// POST /api/session/fetch - Fetch a fresh pool for the given preferences
///
/// The body is a preference set; omitted fields fall back to their
/// defaults. Returns the session state after the fetch; a failed search is
/// reported both in the state and through the status code.
async fn fetch(
    State(state): State<AppState>,
    Json(preferences): Json<PreferenceSet>,
) -> impl IntoResponse {
    info!(?preferences, "fetching recommendations");
    state.session.fetch(&preferences).await;

    let snapshot = state.session.snapshot();
    let code = if snapshot.error_message.is_some() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };
    (code, Json(snapshot))
}

/// POST /api/session/regenerate - Draw the next batch of unseen articles
async fn regenerate(State(state): State<AppState>) -> impl IntoResponse {
    state.session.regenerate();
    Json(state.session.snapshot())
}

/// PUT /api/session/quantity - Update the batch size
///
/// Out-of-range values are ignored; the response carries the quantity
/// actually in effect.
async fn update_quantity(
    State(state): State<AppState>,
    Json(update): Json<QuantityUpdate>,
) -> impl IntoResponse {
    state.session.update_quantity(update.quantity);
    Json(state.session.snapshot())
}
