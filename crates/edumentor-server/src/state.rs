use edumentor_analytics::EngagementAggregator;
use edumentor_core::config::AppConfig;
use edumentor_core::CompletionClient;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for the server.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub aggregator: Arc<RwLock<EngagementAggregator>>,
    pub completion: Arc<CompletionClient>,
}

impl AppState {
    /// Build state with a completion client for the configured provider.
    pub fn new(config: AppConfig) -> Self {
        let completion = CompletionClient::from_config(&config);
        Self::with_completion(config, completion)
    }

    pub fn with_completion(config: AppConfig, completion: CompletionClient) -> Self {
        let aggregator = EngagementAggregator::new(config.topics.clone());
        Self {
            config,
            aggregator: Arc::new(RwLock::new(aggregator)),
            completion: Arc::new(completion),
        }
    }
}
