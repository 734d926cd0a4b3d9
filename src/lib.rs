pub mod config;
pub mod http;
pub mod infra;

use crate::config::AppConfig;
use crate::infra::cache::CacheManager;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub cache: CacheManager,
}
