use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use minijinja::context;
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginForm, NextQuery, RegisterForm},
        extractors::{login_url, safe_next, CurrentUser, RequireUser, DEFAULT_LANDING},
        flash::{self, Flash, Severity},
        password::{hash_password, verify_password},
        repo::{StoreError, UserStore},
        repo_types::{Identity, UniqueField, User},
        session,
    },
    error::{AppError, AuthError},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}

#[instrument(skip_all)]
pub async fn register_form(
    State(state): State<AppState>,
    current: CurrentUser,
    session: Session,
) -> Result<Response, AppError> {
    if current.is_authenticated() {
        return Ok(Redirect::to(DEFAULT_LANDING).into_response());
    }
    let flashes = flash::take(&session).await?;
    let page = state
        .views
        .render("register.html", None, &flashes, context! {})?;
    Ok(page.into_response())
}

#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    current: CurrentUser,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, AppError> {
    if current.is_authenticated() {
        return Ok(Redirect::to(DEFAULT_LANDING));
    }

    match register_user(state.users.as_ref(), &form).await {
        Ok(user) => {
            info!(user_id = user.id, username = %user.username, "user registered");
            flash::push(
                &session,
                Flash::new(
                    Severity::Success,
                    "Registration successful. You can now log in!",
                ),
            )
            .await?;
            Ok(Redirect::to("/login"))
        }
        Err(e) => {
            warn!(error = %e, "registration rejected");
            flash::push(&session, Flash::new(Severity::Danger, e.to_string())).await?;
            Ok(Redirect::to("/register"))
        }
    }
}

/// Validates, checks uniqueness, hashes and stores a new user. The store's
/// own constraint still decides when two registrations race.
pub async fn register_user(users: &dyn UserStore, form: &RegisterForm) -> Result<User, AuthError> {
    let username = form.username.trim();
    let email = form.email.trim();
    if username.is_empty() || email.is_empty() || form.password.is_empty() {
        return Err(AuthError::Validation);
    }

    if users.find_by_username(username).await?.is_some() {
        return Err(AuthError::Conflict(UniqueField::Username));
    }
    if users.find_by_email(email).await?.is_some() {
        return Err(AuthError::Conflict(UniqueField::Email));
    }

    let hash = hash_password(&form.password).map_err(|e| AuthError::Persistence(e.to_string()))?;
    Ok(users.create(username, email, &hash).await?)
}

#[instrument(skip_all)]
pub async fn login_form(
    State(state): State<AppState>,
    current: CurrentUser,
    session: Session,
    Query(q): Query<NextQuery>,
) -> Result<Response, AppError> {
    if current.is_authenticated() {
        return Ok(Redirect::to(DEFAULT_LANDING).into_response());
    }
    let next = q
        .next
        .as_deref()
        .and_then(safe_next)
        .map(|n| urlencoding::encode(n).into_owned());
    let flashes = flash::take(&session).await?;
    let page = state
        .views
        .render("login.html", None, &flashes, context! { next => next })?;
    Ok(page.into_response())
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    current: CurrentUser,
    session: Session,
    Query(q): Query<NextQuery>,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, AppError> {
    if current.is_authenticated() {
        return Ok(Redirect::to(DEFAULT_LANDING));
    }

    let Some(user) = authenticate(state.users.as_ref(), &form).await? else {
        warn!(username = %form.username, "login rejected");
        flash::push(
            &session,
            Flash::new(Severity::Danger, AuthError::Authentication.to_string()),
        )
        .await?;
        return Ok(Redirect::to(&login_url(q.next.as_deref())));
    };

    let remember = form.remember();
    session::log_in(
        &session,
        &user,
        remember,
        state.config.session.remember_me_days,
    )
    .await?;
    flash::push(&session, Flash::new(Severity::Success, "Login successful!")).await?;
    info!(user_id = user.id, remember, "user logged in");

    let target = q
        .next
        .as_deref()
        .and_then(safe_next)
        .unwrap_or(DEFAULT_LANDING);
    Ok(Redirect::to(target))
}

/// Unknown user and wrong password are deliberately indistinguishable.
/// The username is trimmed the same way registration stores it.
pub async fn authenticate(
    users: &dyn UserStore,
    form: &LoginForm,
) -> Result<Option<User>, StoreError> {
    let Some(user) = users.find_by_username(form.username.trim()).await? else {
        return Ok(None);
    };
    Ok(verify_password(&form.password, &user.password_hash).then_some(user))
}

#[instrument(skip_all)]
pub async fn logout(RequireUser(user): RequireUser, session: Session) -> Result<Redirect, AppError> {
    session::log_out(&session).await?;
    flash::push(
        &session,
        Flash::new(Severity::Info, "You have been logged out."),
    )
    .await?;
    info!(user_id = user.id, identity = ?user.identity(), "user logged out");
    Ok(Redirect::to("/"))
}
