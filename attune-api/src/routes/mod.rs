//! API route definitions

mod bookmarks;
mod health;
mod session;

use crate::AppState;
use axum::Router;

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(session::routes())
        .merge(bookmarks::routes())
        .merge(health::routes())
}
