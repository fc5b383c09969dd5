//! Route definitions for the notewise server.

use axum::{
    Router, middleware,
    routing::{get, post}
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer
};

use crate::guard::session_guard;
use crate::handlers::{self, note_api};
use crate::state::AppState;

/// Creates the Axum router with all routes configured.
///
/// The session guard wraps every route and the fallback, so page paths such
/// as `/dashboard` and `/login` are gated even though this server does not
/// render them.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/summarize", post(handlers::summarize))
        .route("/notes", get(note_api::list_notes).post(note_api::create_note))
        .route(
            "/notes/{id}",
            get(note_api::get_note)
                .patch(note_api::update_note)
                .delete(note_api::delete_note)
        )
        .route("/notes/{id}/summarize", post(note_api::resummarize_note))
        .layer(cors);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route("/auth/signout", post(handlers::sign_out))
        .nest("/api", api)
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), session_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
