use crate::config::ServerConfig;
use chat::RagChain;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Answering chain (shared across requests)
    pub chain: RagChain,

    /// Prometheus recorder handle, absent when metrics are disabled
    pub metrics: Option<PrometheusHandle>,
}

impl ServerState {
    /// Create new server state
    pub fn new(config: ServerConfig, chain: RagChain) -> Self {
        Self {
            config: Arc::new(config),
            chain,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
