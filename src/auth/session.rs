//! Session lifecycle: Anonymous <-> Authenticated.

use sha2::{Digest, Sha512};
use time::Duration;
use tower_sessions::{
    cookie::{Key, SameSite},
    service::SignedCookie,
    session, Expiry, Session, SessionManagerLayer, SessionStore,
};
use tracing::debug;

use crate::auth::repo::{StoreError, UserStore};
use crate::auth::repo_types::User;
use crate::config::SessionConfig;

const USER_KEY: &str = "_user_id";
pub const COOKIE_NAME: &str = "session";

/// Cookie-backed session layer signed with a key derived from the secret.
pub fn layer<S>(store: S, config: &SessionConfig) -> SessionManagerLayer<S, SignedCookie>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(COOKIE_NAME)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(config.cookie_secure)
        .with_expiry(Expiry::OnSessionEnd)
        .with_signed(signing_key(&config.secret_key))
}

fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Binds the session to `user`. The id is cycled so a pre-login session
/// id cannot be reused.
pub async fn log_in(
    session: &Session,
    user: &User,
    remember: bool,
    remember_days: i64,
) -> Result<(), session::Error> {
    session.cycle_id().await?;
    session.insert(USER_KEY, user.id.to_string()).await?;
    session.set_expiry(Some(expiry_for(remember, remember_days)));
    Ok(())
}

/// Short-lived sessions die with the browser; remembered ones persist.
pub fn expiry_for(remember: bool, remember_days: i64) -> Expiry {
    if remember {
        Expiry::OnInactivity(Duration::days(remember_days))
    } else {
        Expiry::OnSessionEnd
    }
}

pub async fn log_out(session: &Session) -> Result<(), session::Error> {
    session.flush().await
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Session(#[from] session::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Loads the user bound to this session, if any. Stale or unparsable
/// identities are dropped and count as anonymous.
pub async fn resolve(
    session: &Session,
    users: &dyn UserStore,
) -> Result<Option<User>, ResolveError> {
    let Some(identity) = session.get::<String>(USER_KEY).await? else {
        return Ok(None);
    };

    let user = match identity.parse::<i64>() {
        Ok(id) => users.find_by_id(id).await?,
        Err(_) => None,
    };

    if user.is_none() {
        debug!(%identity, "session bound to unknown user; dropping");
        session.remove::<String>(USER_KEY).await?;
    }
    Ok(user)
}
