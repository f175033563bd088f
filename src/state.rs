use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::config::AppConfig;
use crate::users::repo::{PgUserStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let store = PgUserStore::new(db);
        store.migrate().await?;

        Ok(Self::from_parts(
            Arc::new(store) as Arc<dyn UserStore>,
            config,
        ))
    }

    pub fn from_parts(store: Arc<dyn UserStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        use crate::users::memory::MemoryUserStore;
        use time::macros::offset;

        let config = Arc::new(AppConfig {
            database_url: "memory://".into(),
            max_connections: 1,
            host: "127.0.0.1".into(),
            port: 0,
            utc_offset: offset!(+2),
        });
        Self::from_parts(Arc::new(MemoryUserStore::new()), config)
    }
}
