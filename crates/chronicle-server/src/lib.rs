//! chronicle-server - REST API server for chronicle.
//!
//! Serves the public changelog views and the token-gated admin views over a
//! shared changelog store.
//!
//! # Example
//!
//! ```ignore
//! use chronicle_server::{create_server, AppState};
//! use chronicle_core::ChronicleConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let state = AppState::open(ChronicleConfig::default()).unwrap();
//!     let app = create_server(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{middleware as axum_middleware, Router};
use tower_http::trace::TraceLayer;

/// Create the server with all routes and middleware.
pub fn create_server(state: AppState) -> Router {
    routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
