//! Gender API module

mod handler;

use axum::{
    Router,
    routing::get,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/genders", gender_routes())
}

fn gender_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/public", get(handler::public_list))
}
