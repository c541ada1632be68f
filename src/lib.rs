pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;

pub use blockchain::{LogFilter, ProviderRegistry, RpcClient, UpstreamClient};
pub use config::{AppConfig, ContractConfig, LoggingConfig, RpcConfig, ServerConfig};
pub use error::{GatewayError, LogNormalizationError, Result, RpcError, ValidationError};
pub use logging::{ErrorLogger, LogContext, MetricsLogger, PerformanceMonitor};
pub use models::{Address, BlockReference, LogEntry, LogEntryJson, Network};
