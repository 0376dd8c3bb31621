use axum::{extract::State, response::Html, routing::get, Router};
use minijinja::context;
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    auth::{
        extractors::{CurrentUser, RequireUser},
        flash,
    },
    error::AppError,
    state::AppState,
};

pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/dashboard", get(dashboard))
}

#[instrument(skip_all)]
pub async fn home(
    State(state): State<AppState>,
    current: CurrentUser,
    session: Session,
) -> Result<Html<String>, AppError> {
    let flashes = flash::take(&session).await?;
    state
        .views
        .render("index.html", current.user(), &flashes, context! {})
}

#[instrument(skip_all)]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    session: Session,
) -> Result<Html<String>, AppError> {
    let flashes = flash::take(&session).await?;
    state
        .views
        .render("dashboard.html", Some(&user), &flashes, context! {})
}
