//! Reception API module

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/receptions", reception_routes())
}

fn reception_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
        // Customer raises a hand; staff clears it
        .route("/{id}/call", put(handler::call_attention))
        .route("/{id}/attend", put(handler::attend))
}
