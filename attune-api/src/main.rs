//! Attune API Server
//!
//! HTTP front end for the recommendation session: preference-driven
//! fetches, batch paging, quantity updates and bookmarks.

mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use attune_news::{NewsApiClient, NewsApiConfig};
use attune_session::{BookmarkStore, JsonFileStore, KeyValueStore, RecommendationSession};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RecommendationSession>,
    pub bookmarks: Arc<BookmarkStore>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,attune_api=debug")),
        )
        .init();

    info!("Starting Attune API");

    let config = NewsApiConfig::from_env()?;
    let search = Arc::new(NewsApiClient::new(config));

    let state_path =
        std::env::var("ATTUNE_DATA_PATH").unwrap_or_else(|_| "data/attune-state.json".to_string());
    info!("Persisting session state at: {}", state_path);
    let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(state_path));

    let session = Arc::new(RecommendationSession::new(search, Arc::clone(&store)));
    let bookmarks = Arc::new(BookmarkStore::new(store));

    let state = AppState { session, bookmarks };

    // Configure CORS for frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    // Build router
    let app = Router::new()
        .nest("/api", routes::api_routes())
        .layer(cors)
        .with_state(state);

    // Start server
    let port = std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
