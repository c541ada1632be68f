use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::error::RpcError;
use crate::logging::{LogContext, MetricsLogger, PerformanceMonitor};
use crate::models::{Address, BlockReference, LogEntry, Network};

#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: &'static str,
    method: String,
    params: Vec<Value>,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

/// `eth_getLogs` filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogFilter {
    #[serde(rename = "fromBlock")]
    pub from_block: BlockReference,
    pub address: Address,
}

/// Log object exactly as the node sends it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EthLog {
    address: String,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    data: String,
    block_number: Option<String>,
    transaction_hash: Option<String>,
    transaction_index: Option<String>,
    block_hash: Option<String>,
    log_index: Option<String>,
    #[serde(default)]
    removed: bool,
}

impl EthLog {
    fn into_entry(self) -> Result<LogEntry, RpcError> {
        Ok(LogEntry {
            address: self.address,
            topics: self
                .topics
                .iter()
                .map(|topic| parse_hex_bytes(topic))
                .collect::<Result<Vec<_>, _>>()?,
            data: self.data,
            block_number: self.block_number.as_deref().map(parse_hex_to_u64).transpose()?,
            transaction_hash: self.transaction_hash.as_deref().map(parse_hex_bytes).transpose()?,
            transaction_index: self.transaction_index.as_deref().map(parse_hex_to_u64).transpose()?,
            block_hash: self.block_hash.as_deref().map(parse_hex_bytes).transpose()?,
            log_index: self.log_index.as_deref().map(parse_hex_to_u64).transpose()?,
            removed: self.removed,
        })
    }
}

/// JSON-RPC client bound to one network's node. Every call is a single
/// attempt; retries and caching are left to the caller.
#[derive(Clone)]
pub struct RpcClient {
    client: Client,
    endpoint: String,
    network: Network,
    timeout_seconds: u64,
}

impl RpcClient {
    pub fn new(network: Network, endpoint: String, timeout_seconds: u64) -> Result<Self, RpcError> {
        let context = LogContext::new("rpc_client", "initialization")
            .with_network(network)
            .with_metadata("endpoint", serde_json::json!(endpoint))
            .with_metadata("timeout_seconds", serde_json::json!(timeout_seconds));
        context.info("Initializing RPC client");

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            network,
            timeout_seconds,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn network(&self) -> Network {
        self.network
    }

    async fn make_request(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method: method.to_string(),
            params,
            id: 1,
        };

        LogContext::new("rpc_client", "make_request")
            .with_network(self.network)
            .with_metadata("method", serde_json::json!(method))
            .trace(&format!("Sending RPC request: {}", method));

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RpcError::Timeout {
                        seconds: self.timeout_seconds,
                    }
                } else if e.is_connect() {
                    RpcError::Connection(e.to_string())
                } else {
                    RpcError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let rpc_response: JsonRpcResponse = serde_json::from_slice(&body)?;

        if let Some(error) = rpc_response.error {
            return Err(RpcError::from_node(error.code, error.message));
        }

        rpc_response
            .result
            .ok_or_else(|| RpcError::InvalidResponse("No result in response".to_string()))
    }

    async fn timed_request(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcError> {
        let monitor = PerformanceMonitor::new(method).with_metadata("network", serde_json::json!(self.network));
        let result = self.make_request(method, params).await;
        let duration = monitor.finish_with_result(&result);
        MetricsLogger::log_rpc_call(self.network, method, duration, result.is_ok());
        result
    }

    /// `eth_getBalance` for a checksummed address at the given block
    pub async fn get_balance(&self, address: &Address, block: &BlockReference) -> Result<u128, RpcError> {
        let params = vec![
            Value::String(address.to_checksum()),
            Value::String(block.as_str().to_string()),
        ];
        let result = self.timed_request("eth_getBalance", params).await?;

        let quantity = result
            .as_str()
            .ok_or_else(|| RpcError::InvalidResponse("Balance is not a string".to_string()))?;
        parse_hex_to_u128(quantity)
    }

    /// `eth_getLogs` with the given filter
    pub async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<LogEntry>, RpcError> {
        let params = vec![serde_json::to_value(filter)?];
        let result = self.timed_request("eth_getLogs", params).await?;

        let eth_logs: Vec<EthLog> = serde_json::from_value(result)
            .map_err(|e| RpcError::InvalidResponse(format!("Failed to parse logs: {}", e)))?;

        let entries = eth_logs
            .into_iter()
            .map(EthLog::into_entry)
            .collect::<Result<Vec<_>, _>>()?;

        LogContext::new("rpc_client", "get_logs")
            .with_network(self.network)
            .with_block(&filter.from_block)
            .with_metadata("log_count", serde_json::json!(entries.len()))
            .debug(&format!("Retrieved {} logs", entries.len()));

        Ok(entries)
    }
}

fn strip_hex_prefix(hex_str: &str) -> &str {
    hex_str.strip_prefix("0x").unwrap_or(hex_str)
}

fn parse_hex_to_u64(hex_str: &str) -> Result<u64, RpcError> {
    u64::from_str_radix(strip_hex_prefix(hex_str), 16)
        .map_err(|e| RpcError::InvalidResponse(format!("Failed to parse hex '{}' to u64: {}", hex_str, e)))
}

fn parse_hex_to_u128(hex_str: &str) -> Result<u128, RpcError> {
    u128::from_str_radix(strip_hex_prefix(hex_str), 16)
        .map_err(|e| RpcError::InvalidResponse(format!("Failed to parse hex '{}' to u128: {}", hex_str, e)))
}

fn parse_hex_bytes(hex_str: &str) -> Result<Vec<u8>, RpcError> {
    hex::decode(strip_hex_prefix(hex_str))
        .map_err(|e| RpcError::InvalidResponse(format!("Failed to decode hex '{}': {}", hex_str, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rpc_client_creation() {
        let client = RpcClient::new(Network::Ethereum, "https://rpc.ankr.com/eth".to_string(), 30).unwrap();
        assert_eq!(client.endpoint(), "https://rpc.ankr.com/eth");
        assert_eq!(client.network(), Network::Ethereum);
    }

    #[test]
    fn test_json_rpc_request_serialization() {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method: "eth_getBalance".to_string(),
            params: vec![json!("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"), json!("latest")],
            id: 1,
        };

        let serialized = serde_json::to_string(&request).unwrap();
        let expected = r#"{"jsonrpc":"2.0","method":"eth_getBalance","params":["0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed","latest"],"id":1}"#;
        assert_eq!(serialized, expected);
    }

    #[test]
    fn test_json_rpc_response_deserialization_error() {
        let response_json = r#"{"jsonrpc":"2.0","error":{"code":-32602,"message":"invalid argument 1"},"id":1}"#;
        let response: JsonRpcResponse = serde_json::from_str(response_json).unwrap();

        assert!(response.result.is_none());
        let error = response.error.unwrap();
        assert_eq!(error.code, -32602);
        assert_eq!(error.message, "invalid argument 1");
    }

    #[test]
    fn test_log_filter_serialization() {
        let filter = LogFilter {
            from_block: BlockReference::parse("13371337").unwrap(),
            address: Address::parse("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap(),
        };

        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({
                "fromBlock": "0x13371337",
                "address": "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            })
        );
    }

    #[test]
    fn test_parse_hex_quantities() {
        assert_eq!(parse_hex_to_u64("0x15d9f63").unwrap(), 22910051);
        assert_eq!(parse_hex_to_u64("0x0").unwrap(), 0);
        assert!(parse_hex_to_u64("0x").is_err());
        assert!(parse_hex_to_u64("invalid").is_err());

        assert_eq!(parse_hex_to_u128("0xcc07c9").unwrap(), 13371337);
        assert_eq!(
            parse_hex_to_u128("0x56bc75e2d63100000").unwrap(),
            100_000_000_000_000_000_000u128
        );
    }

    #[test]
    fn test_eth_log_into_entry() {
        let raw = json!({
            "address": "0x66357dcace80431aee0a7507e2e361b7e2402370",
            "topics": ["0x54787c404bb33c88e86f4baf88183a3b0141d0a848e6a9f7a13b66ae3a9b73d1"],
            "data": "0x",
            "blockNumber": "0x15d9f63",
            "transactionHash": "0x0abcb7282373198c0b2c0c6bf1f181dc56026cf4b30ffc6403a94f055b5ca57d",
            "transactionIndex": "0x2",
            "blockHash": "0xf90224ae8f874bdb517184d36be695c53eff12151e6516e46656573d15fbd2dc",
            "logIndex": "0xd",
            "removed": false
        });

        let entry = serde_json::from_value::<EthLog>(raw).unwrap().into_entry().unwrap();
        assert_eq!(entry.block_number, Some(22910051));
        assert_eq!(entry.transaction_index, Some(2));
        assert_eq!(entry.log_index, Some(13));
        assert_eq!(entry.topics[0].len(), 32);
        assert_eq!(entry.block_hash.as_ref().map(|h| h[0]), Some(0xf9));
    }

    #[test]
    fn test_pending_log_keeps_nulls() {
        let raw = json!({
            "address": "0x66357dcace80431aee0a7507e2e361b7e2402370",
            "topics": [],
            "data": "0x",
            "blockNumber": null,
            "transactionHash": null,
            "transactionIndex": null,
            "blockHash": null,
            "logIndex": null
        });

        let entry = serde_json::from_value::<EthLog>(raw).unwrap().into_entry().unwrap();
        assert_eq!(entry.block_number, None);
        assert_eq!(entry.block_hash, None);
        assert!(!entry.removed);
    }
}
