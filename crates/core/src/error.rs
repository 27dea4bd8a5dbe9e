//! Error types for the VitalChat domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all VitalChat operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- LLM provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Health data errors ---
    #[error("Health data error: {0}")]
    HealthData(#[from] HealthDataError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Errors from the LLM backend.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Errors from the health-data store.
///
/// `InvalidMetricType` means a metric key could not be resolved to provider
/// query parameters; tools recover it into model-readable text. A
/// `ProviderFailure` (revoked permission, I/O error) is not recovered
/// locally — the tool cannot supply data it cannot fetch, so it propagates
/// to the session layer. Nothing in this taxonomy is retried automatically.
#[derive(Debug, Clone, Error)]
pub enum HealthDataError {
    #[error("Unknown metric type: {0}")]
    InvalidMetricType(String),

    #[error("Health store query failed: {0}")]
    ProviderFailure(String),
}

/// Errors from tool execution.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool execution failed: {tool_name} — {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}
