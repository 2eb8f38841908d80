use thiserror::Error;

/// Errors returned by the store-locator API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A 2xx response whose body carries `"error"` or `"success": false`.
    #[error("{0}")]
    Api(String),

    #[error("invalid API URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl ClientError {
    /// The server's own message for application-level failures, shown verbatim.
    #[must_use]
    pub fn api_message(&self) -> Option<&str> {
        match self {
            ClientError::Api(message) => Some(message),
            _ => None,
        }
    }
}
