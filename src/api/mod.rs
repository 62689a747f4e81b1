mod error;
mod extract;
mod handlers;
pub mod middleware;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::TokenKeys;
use crate::db::Database;

pub use error::ApiError;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tokens: TokenKeys,
}

pub fn create_router(db: Database, tokens: TokenKeys) -> Router {
    let state = AppState { db, tokens };

    let notes = Router::new()
        .route("/notes", get(handlers::list_notes))
        .route("/notes", post(handlers::create_note))
        .route("/notes/{id}", delete(handlers::delete_note))
        .route("/notes/{id}", put(handlers::edit_note))
        .route("/edit/{id}", put(handlers::edit_note))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_token));

    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/health", get(handlers::health))
        .merge(notes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
