//! Restaurant discovery service.
//!
//! Serves a catalog of restaurants imported from Zomato style exports, with
//! paging, name search, radius search and a pass-through image search.
//!
//!
//!
//! # Data
//!
//! - One collection of chain documents, each embedding a list of restaurant entries
//! - Written once by the `import` binary, read-only for the server
//! - Restaurant ids are not unique across chains, lookups return the first match
//!
//!
//!
//! # Routes
//!
//! | Method | Path | Params |
//! |---|---|---|
//! | GET | `/api/restaurants` | `page`, `limit` |
//! | GET | `/locationR` | `lat`, `lng`, `radius` (km) |
//! | GET | `/namesearch` | `name` |
//! | GET | `/restaurants/{id}` | |
//! | POST | `/searchimage` | multipart `image` |
//!
//!
//!
//! # Setup
//!
//! Load data.
//! ```sh
//! cargo run --bin import -- data/restaurants.json --replace
//! ```
//!
//! Serve.
//! ```sh
//! RUST_LOG=info cargo run --bin server
//! ```
//!
//! Serve straight from a file, no Redis needed.
//! ```sh
//! RESTAURANTS_FILE=data/restaurants.json cargo run --bin server
//! ```
use std::{sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod geo;
pub mod models;
pub mod routes;
pub mod search;
pub mod state;
pub mod utils;

use routes::{
    image_search_handler, location_handler, name_search_handler, restaurant_handler,
    restaurants_handler,
};
use state::AppState;

pub async fn start_server() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/api/restaurants", get(restaurants_handler))
        .route("/locationR", get(location_handler))
        .route("/namesearch", get(name_search_handler))
        .route("/restaurants/{id}", get(restaurant_handler))
        .route(
            "/searchimage",
            post(image_search_handler).layer(upload_limit),
        )
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
