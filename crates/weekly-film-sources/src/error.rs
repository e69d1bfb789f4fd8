use thiserror::Error;

/// Why a feed fetch failed.
///
/// Callers treat every variant as "this refresh cycle failed"; the variant
/// exists for diagnostics.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// Timeout, DNS failure, connection reset, or an unreadable body.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP error: {status}")]
    Http { status: u16, body: String },

    /// Body is not the expected JSON envelope. `body` holds the raw text.
    #[error("JSON decode error: {message}")]
    Parse { message: String, body: String },

    /// Well-formed envelope whose success flag is false or missing.
    #[error("API returned unsuccessful response: {}", .message.as_deref().unwrap_or("no message"))]
    ApiLogic { message: Option<String> },
}

impl FeedError {
    /// Stable short name used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            FeedError::Client(_) => "client_error",
            FeedError::Transport(_) => "transport_error",
            FeedError::Http { .. } => "http_error",
            FeedError::Parse { .. } => "parse_error",
            FeedError::ApiLogic { .. } => "api_logic_error",
        }
    }

    /// Raw response text, when the failure carried one.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            FeedError::Http { body, .. } | FeedError::Parse { body, .. } => Some(body),
            _ => None,
        }
    }
}
