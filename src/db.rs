use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tower_sessions::ExpiredDeletion;
use tower_sessions_sqlx_store::PostgresStore;
use tracing::{info, warn};

use crate::config::AppConfig;

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("run migrations")?;
    info!("database ready");
    Ok(db)
}

/// Server-side session records, with a background sweep of expired rows.
pub async fn session_store(db: PgPool) -> anyhow::Result<PostgresStore> {
    let store = PostgresStore::new(db);
    store.migrate().await.context("migrate session store")?;

    let sweeper = store.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(std::time::Duration::from_secs(60 * 10));
        loop {
            tick.tick().await;
            if let Err(e) = sweeper.delete_expired().await {
                warn!(error = %e, "delete expired sessions failed");
            }
        }
    });

    Ok(store)
}
