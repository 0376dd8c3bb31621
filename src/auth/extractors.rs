use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::{debug, instrument};

use super::{
    flash::{self, Flash, Severity},
    repo_types::{Identity, User},
    session,
};
use crate::{error::AppError, state::AppState};

pub const LOGIN_REQUIRED: &str = "Please log in to access this page.";
pub const DEFAULT_LANDING: &str = "/dashboard";

/// Who is making this request. Never rejects on anonymity.
#[derive(Debug, Clone)]
pub enum CurrentUser {
    Anonymous,
    Authenticated(User),
}

impl CurrentUser {
    pub fn user(&self) -> Option<&User> {
        match self {
            CurrentUser::Anonymous => None,
            CurrentUser::Authenticated(u) => Some(u),
        }
    }
}

impl Identity for CurrentUser {
    fn identity(&self) -> Option<String> {
        self.user().and_then(|u| u.identity())
    }

    fn is_authenticated(&self) -> bool {
        matches!(self, CurrentUser::Authenticated(_))
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(cached) = parts.extensions.get::<CurrentUser>() {
            return Ok(cached.clone());
        }

        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let current = match session::resolve(&session, state.users.as_ref()).await {
            Ok(Some(user)) => CurrentUser::Authenticated(user),
            Ok(None) => CurrentUser::Anonymous,
            Err(e) => return Err(AppError::from(e).into_response()),
        };

        parts.extensions.insert(current.clone());
        Ok(current)
    }
}

/// Access guard: yields the logged-in user or redirects to the login page
/// with the requested path preserved in `next`.
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = Response;

    #[instrument(skip_all, fields(path = %parts.uri.path()))]
    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let CurrentUser::Authenticated(user) =
            CurrentUser::from_request_parts(parts, state).await?
        {
            return Ok(RequireUser(user));
        }

        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        flash::push(&session, Flash::new(Severity::Warning, LOGIN_REQUIRED))
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        let requested = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        debug!(%requested, "anonymous request to protected route");
        Err(Redirect::to(&login_url(Some(requested))).into_response())
    }
}

pub fn login_url(next: Option<&str>) -> String {
    match next.and_then(safe_next) {
        Some(next) => format!("/login?next={}", urlencoding::encode(next)),
        None => "/login".to_string(),
    }
}

/// Accepts only local absolute paths so `next` cannot redirect off-site.
pub fn safe_next(next: &str) -> Option<&str> {
    let local = next.starts_with('/')
        && !next.starts_with("//")
        && !next.contains('\\')
        && !next.contains("://")
        && !next.chars().any(|c| c.is_ascii_control());
    local.then_some(next)
}
