use crate::response::ApiErrorDetail;
use thiserror::Error;

/// Main error type for Tumblr API operations
#[derive(Debug, Error)]
pub enum TumblrError {
    /// Caller input rejected before any request was built
    #[error("invalid argument `{name}`: {message}")]
    Argument { name: &'static str, message: String },

    /// The operation cannot run in the client's current state (e.g. no OAuth token)
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// The client was disposed before the call
    #[error("the client has been disposed")]
    Disposed,

    /// Error envelope returned by the platform
    #[error("Tumblr API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        errors: Vec<ApiErrorDetail>,
    },

    /// Non-2xx HTTP response whose body is not an API envelope
    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    /// Network or transport failure
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The caller cancelled the request
    #[error("request cancelled")]
    Cancelled,

    /// The envelope was well formed but the payload did not match the expected shape
    #[error("failed to decode response: {0}")]
    Decoding(String),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// OAuth handshake failure
    #[error("OAuth error: {0}")]
    OAuth(String),
}

impl TumblrError {
    /// Create an argument error for the named parameter
    pub fn argument(name: &'static str, message: impl Into<String>) -> Self {
        TumblrError::Argument {
            name,
            message: message.into(),
        }
    }

    /// Create the error raised when an operation needs an OAuth token
    pub fn token_required(operation: &str) -> Self {
        TumblrError::InvalidOperation(format!(
            "{} requires an OAuth token to be specified",
            operation
        ))
    }

    /// Wrap any transport failure
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        TumblrError::Transport(Box::new(err))
    }

    /// Check if this error is an authorization failure (401)
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }

    /// Check if this error is a not found error (404)
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Check if the error was raised before any network I/O
    pub fn is_argument(&self) -> bool {
        matches!(self, TumblrError::Argument { .. })
    }

    /// Check if the call was rejected because of the client state (missing token, disposed)
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, TumblrError::InvalidOperation(_) | TumblrError::Disposed)
    }

    /// Get the HTTP status code if this is an API or HTTP error
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TumblrError::Api { status, .. } | TumblrError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TumblrError {
    fn from(err: reqwest::Error) -> Self {
        TumblrError::transport(err)
    }
}

/// Result type for Tumblr operations
pub type Result<T> = std::result::Result<T, TumblrError>;
