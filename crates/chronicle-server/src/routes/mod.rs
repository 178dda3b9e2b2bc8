//! Route definitions for the REST API.

mod admin;
mod changelogs;
mod health;

use axum::{
    middleware as axum_middleware,
    routing::{get, put},
    Router,
};

use crate::middleware::admin_auth;
use crate::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route(
            "/changelogs",
            get(admin::list_changelogs).post(admin::create_changelog),
        )
        .route("/changelogs/new", get(admin::new_changelog))
        .route("/changelogs/:id/edit", get(admin::edit_changelog))
        .route(
            "/changelogs/:id",
            put(admin::update_changelog)
                .patch(admin::update_changelog)
                .delete(admin::destroy_changelog),
        )
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), admin_auth));

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Public changelog views
        .route("/changelogs", get(changelogs::list_changelogs))
        .route("/changelogs/:id", get(changelogs::show_changelog))
        // Admin management, token-gated
        .nest("/admin", admin_routes)
        // Attach state
        .with_state(state)
}

pub use admin::{EditResponse, FormResponse, OutcomeResponse, ADMIN_LIST_PATH};
pub use changelogs::PageQuery;
pub use health::HealthResponse;
