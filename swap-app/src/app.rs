//! Wiring shared by every command: backends, the open repository and the
//! auth service.

use std::time::Duration;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use swap_core::SwapRepository;
use swap_core::auth::SimulatedAuthService;
use swap_core::contract::DEFAULT_PLATFORM_FEE_PERCENTAGE;
use swap_core::db::{MemoryFactory, RepositoryRegistry};
use swap_db_sqlite::SqliteRepositoryFactory;
use tracing::debug;

use crate::config::AppConfig;

/// Every backend this binary can open, keyed by name.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry.register(Box::new(MemoryFactory));
    registry
}

pub struct App {
    pub config: AppConfig,
    pub repo: Box<dyn SwapRepository>,
    pub auth: SimulatedAuthService,
}

impl App {
    pub async fn open(config: AppConfig) -> Result<Self> {
        debug!(backend = %config.database.backend, "opening repository");
        let repo = build_registry()
            .create(&config.database)
            .await
            .with_context(|| {
                format!(
                    "Failed to open {} database '{}'",
                    config.database.backend, config.database.connection_string
                )
            })?;
        let auth = SimulatedAuthService::new(Duration::from_millis(config.simulated_delay_ms));
        Ok(Self { config, repo, auth })
    }

    /// Fee used when a contract does not set its own.
    pub fn default_fee(&self) -> Decimal {
        self.config
            .platform_fee_percentage
            .unwrap_or(DEFAULT_PLATFORM_FEE_PERCENTAGE)
    }
}
