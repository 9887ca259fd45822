use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Boxed cause of a transport failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Every failure a call can produce.
///
/// None of these are retried by the client; callers match on the variant
/// (or on [`Error::kind`]) and pick their own retry policy.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration : {0}")]
    Config(String),
    #[error("invalid request : {0}")]
    Request(String),
    #[error("rate limit reached : {0}")]
    Throttle(String),
    #[error("oauth error : {0}")]
    OAuth(UpstreamError),
    #[error("api error : {0}")]
    Api(UpstreamError),
    #[error("invalid response : {0}")]
    InvalidResponse(String),
    #[error("server responded with status {status} : {message}")]
    Server { status: u16, message: String },
    #[error("transport failed : {0}")]
    Transport(#[source] BoxError),
}

/// Machine-readable discriminant of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    Request,
    Throttle,
    OAuth,
    Api,
    InvalidResponse,
    Server,
    Transport,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Config,
            Error::Request(_) => ErrorKind::Request,
            Error::Throttle(_) => ErrorKind::Throttle,
            Error::OAuth(_) => ErrorKind::OAuth,
            Error::Api(_) => ErrorKind::Api,
            Error::InvalidResponse(_) => ErrorKind::InvalidResponse,
            Error::Server { .. } => ErrorKind::Server,
            Error::Transport(_) => ErrorKind::Transport,
        }
    }

    /// Upstream error code for `OAuth`/`Api`, HTTP status for `Server`.
    pub fn code(&self) -> Option<i64> {
        match self {
            Error::OAuth(e) | Error::Api(e) => Some(e.code),
            Error::Server { status, .. } => Some(i64::from(*status)),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Error::Config(m) | Error::Request(m) | Error::Throttle(m) | Error::InvalidResponse(m) => {
                m.clone()
            }
            Error::OAuth(e) | Error::Api(e) => e.error_message.clone(),
            Error::Server { message, .. } => message.clone(),
            Error::Transport(e) => e.to_string(),
        }
    }

    /// The underlying `reqwest` error of a transport failure, if any.
    ///
    /// Use it for `is_timeout()`/`is_connect()` checks.
    pub fn reqwest_error(&self) -> Option<&reqwest::Error> {
        match self {
            Error::Transport(e) => e.downcast_ref::<reqwest::Error>(),
            _ => None,
        }
    }

    pub(crate) fn transport<E: Into<BoxError>>(e: E) -> Self {
        let e = e.into();
        log::error!("transport error: {}", e);
        Error::Transport(e)
    }

    pub(crate) fn invalid_response<E: ToString>(e: E) -> Self {
        Error::InvalidResponse(e.to_string())
    }
}

/// The error triple reported by the API in a failed response.
///
/// The API reports it either at the top level of the body or nested inside
/// `meta`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UpstreamError {
    pub error_type: String,
    pub error_message: String,
    pub code: i64,
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.error_type, self.error_message)
    }
}

impl UpstreamError {
    /// Extract the error triple from a raw error body.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body).map_err(Error::invalid_response)?;
        Self::from_value(value)
    }

    pub fn from_value(mut value: Value) -> Result<Self> {
        let source = match value.get_mut("meta").map(Value::take) {
            Some(meta) if !meta.is_null() => meta,
            _ => value,
        };
        serde_json::from_value(source)
            .map_err(|e| Error::invalid_response(format!("malformed error body: {}", e)))
    }

    pub fn is_oauth(&self) -> bool {
        self.error_type.to_ascii_lowercase().contains("oauth")
    }

    /// Pick the error variant for this upstream error.
    pub fn into_error(self) -> Error {
        if self.is_oauth() {
            Error::OAuth(self)
        } else {
            Error::Api(self)
        }
    }
}
