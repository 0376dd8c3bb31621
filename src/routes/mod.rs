use crate::state::AppState;
use axum::Router;

pub mod pages;

pub fn router() -> Router<AppState> {
    pages::page_routes()
}
