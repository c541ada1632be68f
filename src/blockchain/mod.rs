pub mod rpc_client;
pub mod upstream;

pub use rpc_client::{LogFilter, RpcClient};
pub use upstream::{ProviderRegistry, UpstreamClient};
