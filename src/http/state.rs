use cache_system::CacheStore;
use config::DatasetConfig;
use record_source::SourceOfRecord;
use std::sync::Arc;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<dyn CacheStore>,
    pub source: Arc<dyn SourceOfRecord>,
    pub datasets: Arc<DatasetConfig>,
    /// Bearer token for admin routes; admin routes are disabled when unset
    pub admin_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        source: Arc<dyn SourceOfRecord>,
        datasets: DatasetConfig,
    ) -> Self {
        Self {
            cache,
            source,
            datasets: Arc::new(datasets),
            admin_token: None,
        }
    }

    pub fn with_admin_token(mut self, token: impl Into<Arc<str>>) -> Self {
        self.admin_token = Some(token.into());
        self
    }
}
