use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Anything a session can be bound to.
pub trait Identity {
    /// Stable identity string stored in the session.
    fn identity(&self) -> Option<String>;
    fn is_authenticated(&self) -> bool;
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 PHC string, never rendered
    pub created_at: OffsetDateTime,
}

impl Identity for User {
    fn identity(&self) -> Option<String> {
        Some(self.id.to_string())
    }

    fn is_authenticated(&self) -> bool {
        true
    }
}

/// Columns that carry a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl std::fmt::Display for UniqueField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UniqueField::Username => f.write_str("username"),
            UniqueField::Email => f.write_str("email"),
        }
    }
}
