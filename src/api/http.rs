use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer};

use crate::blockchain::{LogFilter, ProviderRegistry, UpstreamClient};
use crate::config::AppConfig;
use crate::error::{GatewayError, RpcError, ValidationError};
use crate::logging::{ErrorLogger, LogContext, MetricsLogger};
use crate::models::{normalize_logs, Address, BalancePayload, EventsPayload, LogEntryJson, Network};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Startup failed: {0}")]
    Startup(#[from] GatewayError),
    #[error("Server error: {0}")]
    Server(String),
}

/// Response structure for the balance endpoint
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub balance: u128,
}

/// Response structure for the events endpoint
#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<LogEntryJson>,
}

/// Response structure for the status endpoint
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub networks: Vec<Network>,
    pub contract_address: String,
    pub events_network: Network,
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ErrorReply = (StatusCode, Json<ErrorResponse>);

/// The two upstream-backed operations. They map upstream failures to
/// different status codes: 500 for balance, 404 for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Balance,
    Events,
}

impl Endpoint {
    pub fn route(&self) -> &'static str {
        match self {
            Endpoint::Balance => "/info/balance",
            Endpoint::Events => "/info/events",
        }
    }

    pub fn status_for(&self, error: &GatewayError) -> StatusCode {
        match (self, error) {
            (_, GatewayError::Validation(_)) => StatusCode::BAD_REQUEST,
            (_, GatewayError::Rpc(e)) if e.is_invalid_parameter() => StatusCode::BAD_REQUEST,
            (Endpoint::Balance, GatewayError::Rpc(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            (Endpoint::Events, GatewayError::Rpc(_)) => StatusCode::NOT_FOUND,
            (_, GatewayError::LogNormalization(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            (_, GatewayError::Config(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn reject(&self, error: GatewayError, started: Instant) -> ErrorReply {
        let status = self.status_for(&error);
        let context = LogContext::new("api", self.route()).with_status(status.as_u16());
        ErrorLogger::log_error(&error, Some(context));
        MetricsLogger::log_request(self.route(), status.as_u16(), started.elapsed().as_millis() as u64);

        (status, Json(ErrorResponse { error: error_message(&error) }))
    }

    fn accept(&self, started: Instant) {
        MetricsLogger::log_request(self.route(), StatusCode::OK.as_u16(), started.elapsed().as_millis() as u64);
    }
}

/// Text placed in the `error` field of a failed response. Request-shape
/// problems carry the validation prefix; a bad address is reported bare.
pub fn error_message(error: &GatewayError) -> String {
    match error {
        GatewayError::Validation(e @ ValidationError::InvalidAddress(_)) => e.to_string(),
        GatewayError::Validation(e) => format!("Wasn't able to validate your message: {}", e),
        GatewayError::Rpc(e) => e.to_string(),
        GatewayError::LogNormalization(e) => e.to_string(),
        GatewayError::Config(e) => e.to_string(),
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub providers: Arc<ProviderRegistry>,
    pub contract_address: Address,
    pub events_network: Network,
}

impl AppState {
    pub fn new(providers: ProviderRegistry, contract_address: Address, events_network: Network) -> Self {
        Self {
            providers: Arc::new(providers),
            contract_address,
            events_network,
        }
    }

    /// Build the per-network clients and resolve the events target
    pub fn from_config(config: &AppConfig) -> Result<Self, GatewayError> {
        let providers = ProviderRegistry::from_config(&config.rpc)?;
        let contract_address = config.contract.parsed_address()?;
        let events_network = config.contract.resolved_network()?;
        Ok(Self::new(providers, contract_address, events_network))
    }

    fn client(&self, network: Network) -> Result<Arc<dyn UpstreamClient>, GatewayError> {
        self.providers.get(network).ok_or_else(|| {
            GatewayError::Rpc(RpcError::Connection(format!("No upstream client configured for {}", network)))
        })
    }
}

/// Routes with shared layers, without the request timeout
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/info/balance", post(post_balance))
        .route("/info/events", post(post_events))
        .route("/status", get(get_status))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}

/// HTTP API server
pub struct ApiServer {
    state: AppState,
    pub bind_address: String,
    pub request_timeout: Duration,
}

impl ApiServer {
    pub fn new(state: AppState, bind_address: String, request_timeout: Duration) -> Self {
        Self {
            state,
            bind_address,
            request_timeout,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        config.validate().map_err(GatewayError::from)?;
        Ok(Self::new(
            AppState::from_config(config)?,
            config.bind_address(),
            Duration::from_secs(config.server.request_timeout_seconds),
        ))
    }

    /// Full service as served by [`ApiServer::start`], request timeout included
    pub fn router(&self) -> Router {
        create_router(self.state.clone()).layer(TimeoutLayer::new(self.request_timeout))
    }

    /// Start the HTTP server and run until Ctrl-C
    pub async fn start(&self) -> Result<(), ApiError> {
        let app = self.router();

        let listener = TcpListener::bind(&self.bind_address)
            .await
            .map_err(|e| ApiError::Server(format!("Failed to bind to {}: {}", self.bind_address, e)))?;

        log::info!("HTTP API server starting on {}", self.bind_address);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ApiError::Server(format!("Server error: {}", e)))?;

        log::info!("HTTP API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, GatewayError> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()).into())
}

async fn fetch_balance(state: &AppState, payload: Result<Json<BalancePayload>, JsonRejection>) -> Result<u128, GatewayError> {
    let query = body(payload)?.validate()?;
    let client = state.client(query.network)?;

    LogContext::new("api", "balance")
        .with_network(query.network)
        .with_address(&query.address.to_checksum())
        .with_block(&query.block)
        .debug("Fetching balance");

    Ok(client.get_balance(&query.address, &query.block).await?)
}

async fn fetch_events(state: &AppState, payload: Result<Json<EventsPayload>, JsonRejection>) -> Result<Vec<LogEntryJson>, GatewayError> {
    let query = body(payload)?.validate(state.contract_address)?;
    let client = state.client(state.events_network)?;

    let filter = LogFilter {
        from_block: query.block,
        address: query.contract_address,
    };
    let logs = client.get_logs(&filter).await?;

    Ok(normalize_logs(&logs)?)
}

/// POST /info/balance - Account balance on the selected network
pub async fn post_balance(
    State(state): State<AppState>,
    payload: Result<Json<BalancePayload>, JsonRejection>,
) -> Result<Json<BalanceResponse>, ErrorReply> {
    let started = Instant::now();
    match fetch_balance(&state, payload).await {
        Ok(balance) => {
            Endpoint::Balance.accept(started);
            Ok(Json(BalanceResponse { balance }))
        }
        Err(e) => Err(Endpoint::Balance.reject(e, started)),
    }
}

/// POST /info/events - Logs of the configured contract from a block onwards
pub async fn post_events(
    State(state): State<AppState>,
    payload: Result<Json<EventsPayload>, JsonRejection>,
) -> Result<Json<EventsResponse>, ErrorReply> {
    let started = Instant::now();
    match fetch_events(&state, payload).await {
        Ok(events) => {
            Endpoint::Events.accept(started);
            Ok(Json(EventsResponse { events }))
        }
        Err(e) => Err(Endpoint::Events.reject(e, started)),
    }
}

/// GET /status - Liveness and static routing information
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        networks: state.providers.networks(),
        contract_address: state.contract_address.to_checksum(),
        events_network: state.events_network,
    })
}
