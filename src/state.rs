use crate::auth::{
    memory::MemoryUserStore,
    repo::{PgUserStore, UserStore},
};
use crate::config::AppConfig;
use crate::views::Views;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub views: Arc<Views>,
}

impl AppState {
    pub fn init(config: Arc<AppConfig>, db: PgPool) -> anyhow::Result<Self> {
        let users = Arc::new(PgUserStore::new(db)) as Arc<dyn UserStore>;
        Self::from_parts(config, users)
    }

    pub fn from_parts(config: Arc<AppConfig>, users: Arc<dyn UserStore>) -> anyhow::Result<Self> {
        let views = Arc::new(Views::new()?);
        Ok(Self {
            config,
            users,
            views,
        })
    }

    /// State backed by an in-memory user store.
    pub fn in_memory() -> anyhow::Result<Self> {
        let users = Arc::new(MemoryUserStore::new()) as Arc<dyn UserStore>;
        Self::from_parts(Arc::new(AppConfig::for_tests()), users)
    }
}
