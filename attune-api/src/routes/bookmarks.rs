//! Bookmark endpoints

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use attune_core::Article;

use crate::AppState;

/// Create bookmark routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookmarks", get(list_bookmarks))
        .route("/bookmarks/toggle", post(toggle_bookmark))
}

/// GET /api/bookmarks - Ids of all saved articles
async fn list_bookmarks(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "ids": state.bookmarks.saved_ids()
    }))
}

/// POST /api/bookmarks/toggle - Toggle an article's saved state
async fn toggle_bookmark(
    State(state): State<AppState>,
    Json(article): Json<Article>,
) -> impl IntoResponse {
    let saved = state.bookmarks.toggle(&article);
    Json(serde_json::json!({
        "id": article.id,
        "saved": saved
    }))
}
