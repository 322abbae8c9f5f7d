//! Routes

use axum::{
    routing::{get, post},
    Router,
};

use crate::extractors::AppState;
use crate::handlers::{auth, timeline};

/// Create the complete router
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_router())
        .nest("/api/projects", projects_router())
}

fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/callback", get(auth::callback))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

fn projects_router() -> Router<AppState> {
    Router::new()
        .route("/:id/current-push", get(timeline::get_current_push))
        .route("/:id/timeline", get(timeline::get_timeline))
        .route("/:id/milestones", post(timeline::create_milestone))
        .route("/:id/pushes", post(timeline::create_push))
}
