use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod extractors;
pub mod flash;
pub mod handlers;
pub mod memory;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod session;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
