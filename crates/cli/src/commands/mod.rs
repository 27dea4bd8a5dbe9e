pub mod chat;
pub mod compare;
pub mod doctor;
pub mod fetch;
pub mod metrics;

use std::sync::Arc;

use vitalchat_config::AppConfig;
use vitalchat_core::store::HealthStore;
use vitalchat_health::SyntheticStore;

/// Build the configured health store. Only the synthetic backend exists
/// today; `AppConfig::validate` already rejected anything else.
pub fn build_store(config: &AppConfig) -> Arc<dyn HealthStore> {
    Arc::new(SyntheticStore::new(config.store_seed))
}
