//! One-shot notices carried in the session until the next rendered page.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

const FLASH_KEY: &str = "_flashes";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Danger,
    Info,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flash {
    pub severity: Severity,
    pub message: String,
}

impl Flash {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

pub async fn push(session: &Session, flash: Flash) -> Result<(), tower_sessions::session::Error> {
    let mut queued: Vec<Flash> = session.get(FLASH_KEY).await?.unwrap_or_default();
    queued.push(flash);
    session.insert(FLASH_KEY, queued).await
}

/// Drains queued flashes.
pub async fn take(session: &Session) -> Result<Vec<Flash>, tower_sessions::session::Error> {
    Ok(session
        .remove::<Vec<Flash>>(FLASH_KEY)
        .await?
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Danger).unwrap();
        assert_eq!(json, "\"danger\"");
    }

    #[tokio::test]
    async fn flashes_are_shown_once() {
        let session = session();
        push(&session, Flash::new(Severity::Success, "one")).await.unwrap();
        push(&session, Flash::new(Severity::Warning, "two")).await.unwrap();

        let first = take(&session).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].message, "one");
        assert_eq!(first[1].severity, Severity::Warning);

        assert!(take(&session).await.unwrap().is_empty());
    }
}
