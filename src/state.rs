use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::cache::LiveCache;
use crate::services::store::ScoreStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ScoreStore>,
    pub cache: Arc<dyn LiveCache>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn ScoreStore>, cache: Arc<dyn LiveCache>, config: Arc<AppConfig>) -> Self {
        AppState { store, cache, config }
    }
}
