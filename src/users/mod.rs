use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod filter;
pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod repo;
pub mod repo_types;
pub mod seed;
pub mod services;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::root_routes())
        .merge(handlers::user_routes())
}
