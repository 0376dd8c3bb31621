use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::auth::{
    repo::StoreError,
    repo_types::UniqueField,
    session::ResolveError,
};

/// Failures a user recovers from by fixing the form. `Display` is the
/// flash text.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please fill in all fields.")]
    Validation,
    #[error("{}", conflict_message(.0))]
    Conflict(UniqueField),
    #[error("Incorrect username or password.")]
    Authentication,
    #[error("Error registering user: {0}")]
    Persistence(String),
}

fn conflict_message(field: &UniqueField) -> &'static str {
    match field {
        UniqueField::Username => "Username already exists.",
        UniqueField::Email => "Email is already registered.",
    }
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(field) => AuthError::Conflict(field),
            StoreError::Database(e) => AuthError::Persistence(e.to_string()),
        }
    }
}

/// Infrastructure failures that end the request with a 500.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::Session(e) => AppError::Session(e),
            ResolveError::Store(e) => AppError::Store(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}
