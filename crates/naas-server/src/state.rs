use std::sync::Arc;

use naas_core::kv::KvStore;
use naas_core::metrics::Metrics;
use shared_config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub kv: Arc<dyn KvStore>,
    pub config: Arc<AppConfig>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(kv: Arc<dyn KvStore>, config: AppConfig) -> Self {
        Self {
            kv,
            config: Arc::new(config),
            metrics: Arc::new(Metrics::new().expect("metric registration is infallible for a fixed, well-formed set of metrics")),
        }
    }
}
