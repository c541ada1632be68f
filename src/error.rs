use thiserror::Error;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Log normalization error: {0}")]
    LogNormalization(#[from] LogNormalizationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Request input errors, always reported to the caller as a bad request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field required: {0}")]
    MissingField(String),

    #[error("Invalid network: {0:?}")]
    InvalidNetwork(String),

    #[error("Block number is not a valid int10, int16 or string: {0}")]
    InvalidBlockReference(String),

    #[error("Invalid address: {0:?}")]
    InvalidAddress(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

/// Upstream node errors
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {status}")]
    Status { status: u16 },

    #[error("Timeout after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("RPC method error: code={code}, message={message}")]
    Method { code: i32, message: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl RpcError {
    /// JSON-RPC "invalid request" and "invalid params" codes
    pub const INVALID_PARAMETER_CODES: [i32; 2] = [-32600, -32602];

    /// Build the error for a node-side error object, splitting out
    /// rejections of malformed parameters.
    pub fn from_node(code: i32, message: String) -> Self {
        if Self::INVALID_PARAMETER_CODES.contains(&code) {
            RpcError::InvalidParameter(message)
        } else {
            RpcError::Method { code, message }
        }
    }

    /// True when the node refused the request because of a bad parameter
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, RpcError::InvalidParameter(_))
    }
}

/// Upstream log entries that break the expected shape
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogNormalizationError {
    #[error("Malformed log entry at index {index}: {field} {reason}")]
    MalformedLogEntry {
        index: usize,
        field: String,
        reason: String,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Configuration parsing failed: {0}")]
    Parsing(String),

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Error severity levels for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Process cannot serve requests
    Critical,
    /// Upstream or internal contract broken
    High,
    /// Transient upstream trouble
    Medium,
    /// Caller mistakes
    Low,
}

impl GatewayError {
    /// Get the severity level of an error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GatewayError::Config(_) => ErrorSeverity::Critical,

            GatewayError::LogNormalization(_) => ErrorSeverity::High,
            GatewayError::Rpc(RpcError::InvalidResponse(_)) => ErrorSeverity::High,
            GatewayError::Rpc(RpcError::Json(_)) => ErrorSeverity::High,

            GatewayError::Rpc(RpcError::InvalidParameter(_)) => ErrorSeverity::Low,
            GatewayError::Rpc(_) => ErrorSeverity::Medium,

            GatewayError::Validation(_) => ErrorSeverity::Low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let critical = GatewayError::Config(ConfigError::InvalidUrl("ftp://x".to_string()));
        assert_eq!(critical.severity(), ErrorSeverity::Critical);

        let high = GatewayError::LogNormalization(LogNormalizationError::MalformedLogEntry {
            index: 0,
            field: "blockHash".to_string(),
            reason: "is missing".to_string(),
        });
        assert_eq!(high.severity(), ErrorSeverity::High);

        let medium = GatewayError::Rpc(RpcError::Timeout { seconds: 30 });
        assert_eq!(medium.severity(), ErrorSeverity::Medium);

        let low = GatewayError::Validation(ValidationError::MissingField("wallet".to_string()));
        assert_eq!(low.severity(), ErrorSeverity::Low);
    }

    #[test]
    fn test_node_error_classification() {
        assert!(RpcError::from_node(-32602, "invalid argument 1".to_string()).is_invalid_parameter());
        assert!(RpcError::from_node(-32600, "invalid request".to_string()).is_invalid_parameter());

        let other = RpcError::from_node(-32000, "header not found".to_string());
        assert!(!other.is_invalid_parameter());
        assert!(matches!(other, RpcError::Method { code: -32000, .. }));
    }

    #[test]
    fn test_error_display() {
        let error = GatewayError::Rpc(RpcError::Method {
            code: -32601,
            message: "Method not found".to_string(),
        });
        assert_eq!(
            format!("{}", error),
            "RPC error: RPC method error: code=-32601, message=Method not found"
        );

        let missing = ValidationError::MissingField("wallet".to_string());
        assert_eq!(missing.to_string(), "field required: wallet");
    }
}
