//! Error types for the intents portal

use thiserror::Error;

/// Errors surfaced by the bridge and contract clients.
///
/// Every failure a caller can see falls into one of these buckets; the HTTP
/// layer renders them uniformly through [`PortalError::error_code`] and
/// [`PortalError::status_code`].
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Malformed response from {source_name}: {reason}")]
    MalformedResponse { source_name: String, reason: String },

    #[error("Contract error: {message}")]
    Contract { message: String },

    #[error("Cannot parse '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for portal operations
pub type Result<T> = std::result::Result<T, PortalError>;

impl PortalError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub fn contract(message: impl Into<String>) -> Self {
        Self::Contract {
            message: message.into(),
        }
    }

    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport_error",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::Contract { .. } => "contract_error",
            Self::Parse { .. } => "parse_error",
            Self::Config(_) => "config_error",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Parse { .. } => 400,
            Self::Contract { .. } => 422,
            Self::Transport { .. } | Self::MalformedResponse { .. } => 502,
            Self::Config(_) => 500,
        }
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(e: serde_json::Error) -> Self {
        Self::malformed("json", e.to_string())
    }
}
