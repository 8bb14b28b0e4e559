use std::sync::Arc;

use super::{
    config::Config, database::RedisStore, password::PasswordHasher, store::Store,
    store::StoreError, token::TokenIssuer,
};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub tokens: TokenIssuer,
    pub passwords: PasswordHasher,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Arc<Self>, StoreError> {
        let store = RedisStore::connect(&config.redis_url).await?;

        Ok(Self::with_store(config, Arc::new(store)))
    }

    pub fn with_store(config: Config, store: Arc<dyn Store>) -> Arc<Self> {
        Arc::new(Self {
            tokens: TokenIssuer::new(&config.jwt_secret),
            passwords: PasswordHasher::new(config.password_cost),
            config,
            store,
        })
    }
}
