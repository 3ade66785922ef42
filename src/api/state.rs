use std::sync::Arc;

use crate::config::AppConfig;
use crate::storage::StorageConfig;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageConfig>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(storage: StorageConfig, config: AppConfig) -> Self {
        Self {
            storage: Arc::new(storage),
            config: Arc::new(config),
        }
    }
}
