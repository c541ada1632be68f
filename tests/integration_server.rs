use chain_info_gateway::api::{ApiError, ApiServer};
use chain_info_gateway::config::AppConfig;
use std::time::Duration;

#[tokio::test]
async fn test_api_server_from_default_config() {
    let config = AppConfig::default();
    let server = ApiServer::from_config(&config).expect("default config should build a server");

    assert_eq!(server.bind_address, "0.0.0.0:8080");
    assert_eq!(server.request_timeout, Duration::from_secs(35));
}

#[tokio::test]
async fn test_api_server_with_different_port() {
    let mut config = AppConfig::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 3000;

    let server = ApiServer::from_config(&config).unwrap();
    assert_eq!(server.bind_address, "127.0.0.1:3000");
}

#[tokio::test]
async fn test_api_server_rejects_unknown_events_network() {
    let mut config = AppConfig::default();
    config.contract.network = "solana".to_string();

    let result = ApiServer::from_config(&config);
    assert!(matches!(result, Err(ApiError::Startup(_))));
}

#[tokio::test]
async fn test_api_server_rejects_request_timeout_below_rpc_timeout() {
    let mut config = AppConfig::default();
    config.server.request_timeout_seconds = 10;
    config.rpc.timeout_seconds = 20;

    let result = ApiServer::from_config(&config);
    assert!(matches!(result, Err(ApiError::Startup(_))));
}

#[tokio::test]
async fn test_api_server_reports_bind_failure() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let mut config = AppConfig::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = taken.local_addr().unwrap().port();

    let server = ApiServer::from_config(&config).unwrap();
    let result = server.start().await;
    assert!(matches!(result, Err(ApiError::Server(_))));
}
