use std::fmt;

/// Errors that can occur while forwarding a batch
#[derive(Debug)]
pub enum ForwardError {
    /// Failed to serialize a message to JSON
    Serialization(serde_json::Error),

    /// Request exceeded the 30s client-side timeout
    Timeout,

    /// Network request failed before a response was received
    Network(reqwest::Error),

    /// Server returned a non-2XX status code
    Server { status: u16, body: String },
}

impl fmt::Display for ForwardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForwardError::Serialization(e) => write!(f, "Failed to serialize message: {}", e),
            ForwardError::Timeout => write!(f, "Request timeout (30s)"),
            ForwardError::Network(e) => write!(f, "Network request failed: {}", e),
            ForwardError::Server { status, body } => write!(f, "HTTP {}: {}", status, body),
        }
    }
}

impl std::error::Error for ForwardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ForwardError::Serialization(e) => Some(e),
            ForwardError::Timeout => None,
            ForwardError::Network(e) => Some(e),
            ForwardError::Server { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ForwardError {
    fn from(err: serde_json::Error) -> Self {
        ForwardError::Serialization(err)
    }
}

impl From<reqwest::Error> for ForwardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ForwardError::Timeout
        } else {
            ForwardError::Network(err)
        }
    }
}

impl ForwardError {
    /// Create a server error from response details
    pub fn server_error(status: u16, body: String) -> Self {
        ForwardError::Server { status, body }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            ForwardError::Serialization(_) => false, // Don't retry serialization errors
            ForwardError::Timeout => true,           // Retry timeouts
            ForwardError::Network(_) => true,        // Retry network errors
            ForwardError::Server { status, .. } => {
                // Retry unless it is a 4XX client error
                *status < 400 || *status >= 500
            }
        }
    }
}

/// Result type for forwarding operations
pub type ForwardResult<T> = Result<T, ForwardError>;
