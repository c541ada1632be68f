use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::blockchain::rpc_client::{LogFilter, RpcClient};
use crate::config::RpcConfig;
use crate::error::RpcError;
use crate::models::{Address, BlockReference, LogEntry, Network};

/// Read-only access to one network's node, shared by all requests
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Account balance in the chain's smallest unit
    async fn get_balance(&self, address: &Address, block: &BlockReference) -> Result<u128, RpcError>;

    /// Logs matching the filter, in node order
    async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<LogEntry>, RpcError>;
}

#[async_trait]
impl UpstreamClient for RpcClient {
    async fn get_balance(&self, address: &Address, block: &BlockReference) -> Result<u128, RpcError> {
        RpcClient::get_balance(self, address, block).await
    }

    async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<LogEntry>, RpcError> {
        RpcClient::get_logs(self, filter).await
    }
}

/// Upstream client per supported network, built once at startup
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    clients: HashMap<Network, Arc<dyn UpstreamClient>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// One [`RpcClient`] for every supported network
    pub fn from_config(config: &RpcConfig) -> Result<Self, RpcError> {
        let mut registry = Self::new();
        for network in Network::SUPPORTED {
            if let Some(endpoint) = config.endpoint(network) {
                let client = RpcClient::new(network, endpoint.to_string(), config.timeout_seconds)?;
                registry = registry.with_client(network, Arc::new(client));
            }
        }
        Ok(registry)
    }

    /// Register a client. Registration for `Network::Unknown` is ignored.
    pub fn with_client(mut self, network: Network, client: Arc<dyn UpstreamClient>) -> Self {
        if network.is_known() {
            self.clients.insert(network, client);
        }
        self
    }

    pub fn get(&self, network: Network) -> Option<Arc<dyn UpstreamClient>> {
        self.clients.get(&network).cloned()
    }

    /// Registered networks in declaration order
    pub fn networks(&self) -> Vec<Network> {
        Network::SUPPORTED
            .into_iter()
            .filter(|network| self.clients.contains_key(network))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedBalance(u128);

    #[async_trait]
    impl UpstreamClient for FixedBalance {
        async fn get_balance(&self, _address: &Address, _block: &BlockReference) -> Result<u128, RpcError> {
            Ok(self.0)
        }

        async fn get_logs(&self, _filter: &LogFilter) -> Result<Vec<LogEntry>, RpcError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_from_config_registers_supported_networks() {
        let registry = ProviderRegistry::from_config(&RpcConfig::default()).unwrap();
        assert_eq!(registry.networks(), vec![Network::Avalanche, Network::Ethereum]);
        assert!(registry.get(Network::Unknown).is_none());
    }

    #[test]
    fn test_unknown_network_never_registered() {
        let registry = ProviderRegistry::new()
            .with_client(Network::Unknown, Arc::new(FixedBalance(1)))
            .with_client(Network::Ethereum, Arc::new(FixedBalance(2)));

        assert!(registry.get(Network::Unknown).is_none());
        assert_eq!(registry.networks(), vec![Network::Ethereum]);
    }

    #[tokio::test]
    async fn test_dispatch_by_network() {
        let registry = ProviderRegistry::new()
            .with_client(Network::Avalanche, Arc::new(FixedBalance(1)))
            .with_client(Network::Ethereum, Arc::new(FixedBalance(2)));

        let address = Address::parse("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        let block = BlockReference::parse("latest").unwrap();

        let avalanche = registry.get(Network::Avalanche).unwrap();
        let ethereum = registry.get(Network::Ethereum).unwrap();
        assert_eq!(avalanche.get_balance(&address, &block).await.unwrap(), 1);
        assert_eq!(ethereum.get_balance(&address, &block).await.unwrap(), 2);
    }
}
