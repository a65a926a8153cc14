//! Error types for sumcompare.
//!
//! Uses `thiserror` for public API error types with structured variants
//! covering the LLM, configuration, delivery and comparison domains.

use std::path::PathBuf;

/// Top-level error type for the sumcompare core library.
#[derive(Debug, thiserror::Error)]
pub enum SumcompareError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Comparison error: {0}")]
    Comparison(#[from] ComparisonError),
}

/// Errors from LLM provider interactions.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API request failed: {message}")]
    ApiRequest { message: String },

    #[error("API response parse error: {message}")]
    ResponseParse { message: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Provider connection failed: {message}")]
    Connection { message: String },

    #[error("Provider returned no content")]
    EmptyResponse,
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

/// Errors from report delivery.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Invalid email address '{address}': {message}")]
    InvalidAddress { address: String, message: String },

    #[error("Failed to build email: {message}")]
    Build { message: String },

    #[error("SMTP transport error: {message}")]
    Transport { message: String },

    #[error("Delivery not configured: missing {field}")]
    NotConfigured { field: String },
}

/// Errors from the comparison pipeline itself.
#[derive(Debug, thiserror::Error)]
pub enum ComparisonError {
    #[error("No neighbor summaries were provided for '{original_id}'")]
    NoNeighbors { original_id: String },
}

/// A type alias for results using the top-level `SumcompareError`.
pub type Result<T> = std::result::Result<T, SumcompareError>;
