//! Core Oddsline functionality
//!
//! [`Oddsline`] owns the Redis cache manager and the Postgres source of record built from
//! one [`AppConfig`], and turns them into a served router.

use std::future::Future;
use std::sync::Arc;

use cache_system::{CacheManager, CacheStore};
use config::AppConfig;
use record_source::{PgSource, SourceOfRecord};
use tokio::net::TcpListener;
use tracing::info;

use crate::errors::OddslineError;
use crate::http::{self, AppState};

/// Main Oddsline coordinator that manages the cache and database connections
pub struct Oddsline {
    config: AppConfig,
    cache: Arc<CacheManager>,
    source: Arc<PgSource>,
}

impl Oddsline {
    /// Connect the database pool and prepare the cache manager
    pub async fn new(config: AppConfig) -> Result<Self, OddslineError> {
        let source = PgSource::connect(&config.database).await?;
        let cache = CacheManager::new(config.cache.clone())?;

        Ok(Self {
            config,
            cache: Arc::new(cache),
            source: Arc::new(source),
        })
    }

    /// Handler state wired to the live backends
    pub fn state(&self) -> AppState {
        let state = AppState::new(
            self.cache.clone(),
            self.source.clone(),
            self.config.datasets.clone(),
        );
        match &self.config.server.admin_token {
            Some(token) => state.with_admin_token(token.as_str()),
            None => state,
        }
    }

    pub fn router(&self) -> axum::Router {
        http::build_router(self.state())
    }

    /// Ping Redis and Postgres
    pub async fn health_check(&self) -> Result<(), OddslineError> {
        self.cache.ping().await?;
        self.source.ping().await?;
        Ok(())
    }

    /// Bind the configured address and serve until `shutdown` resolves
    pub async fn serve<F>(&self, shutdown: F) -> Result<(), OddslineError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(&self.config.server.bind_address).await?;
        info!(address = %self.config.server.bind_address, "oddsline listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("oddsline stopped");
        Ok(())
    }
}
