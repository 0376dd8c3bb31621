use std::sync::Arc;

use auth_app::{app, config::AppConfig, db, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "auth_app=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = Arc::new(AppConfig::from_env()?);
    if config.uses_dev_secret() {
        tracing::warn!("running with the development SECRET_KEY; not safe for production");
    }

    let pool = db::connect(&config).await?;
    let session_store = db::session_store(pool.clone()).await?;
    let state = AppState::init(config.clone(), pool)?;

    let app = app::build_app(state, session_store);
    app::serve(app, &config.host, config.port).await
}
