use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod rank;
pub mod repo;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::mobile_routes())
        .merge(handlers::admin_routes())
}
