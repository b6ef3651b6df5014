//! Application state management

use std::sync::Arc;

use crate::characters::SurrealCharacterRepository;
use crate::config::Config;
use crate::error::Result;
use crate::surrealdb_backend::{self, SurrealClient};

/// State shared across handlers
///
/// Cheap to clone: the config and the store client are behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    surrealdb: Arc<SurrealClient>,
}

impl AppState {
    /// Wrap an already connected client
    pub fn new(config: Config, surrealdb: Arc<SurrealClient>) -> Self {
        Self {
            config: Arc::new(config),
            surrealdb,
        }
    }

    /// Connect to the store and define the character schema
    ///
    /// # Errors
    ///
    /// Fails when the store is unreachable after all retries or the schema
    /// cannot be defined.
    pub async fn connect(config: Config) -> Result<Self> {
        let client = Arc::new(surrealdb_backend::create_client(&config.surrealdb).await?);
        SurrealCharacterRepository::new(Arc::clone(&client))
            .define_schema()
            .await?;
        Ok(Self::new(config, client))
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the shared store client
    pub fn surrealdb(&self) -> Arc<SurrealClient> {
        Arc::clone(&self.surrealdb)
    }

    /// Repository over the shared client
    pub fn character_repository(&self) -> SurrealCharacterRepository {
        SurrealCharacterRepository::new(self.surrealdb())
    }
}
