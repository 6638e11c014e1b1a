use clinicdir_review::ReviewError;
use thiserror::Error;

/// Errors returned by the clinic directory API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a `"success": false` envelope.
    #[error("clinic API error: {0}")]
    Api(String),

    #[error("not found: {resource}")]
    NotFound { resource: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid API URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The response body could not be parsed or has the wrong shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A request body could not be encoded as JSON.
    #[error("JSON serialization error for {context}: {source}")]
    Serialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Review(#[from] ReviewError),
}

impl ClientError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
