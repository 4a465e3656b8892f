use thiserror::Error;

#[derive(Debug, Error)]
pub enum SrbError {
    /// A required input was missing or unparseable. Never reaches the dataset or the remote API.
    #[error("{0}")]
    Validation(String),

    /// A startup fetch failed; the dataset was not published.
    #[error("Load error: {0}")]
    Load(String),

    /// A mutation's remote call failed; the local mirror was left unchanged.
    #[error("{0}")]
    RemoteCall(String),

    /// An update targeted a `(country_id, year)` pair the remote store does not have.
    #[error("Record not found: country {country_id}, year {year}")]
    NotFound { country_id: i64, year: i32 },

    #[error("Unexpected status {status} from {method} {path}")]
    Status {
        method: String,
        path: String,
        status: u16,
    },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SrbError {
    pub fn validation(message: impl Into<String>) -> Self {
        SrbError::Validation(message.into())
    }

    /// True for errors a user can fix by changing the form input.
    pub fn is_validation(&self) -> bool {
        matches!(self, SrbError::Validation(_))
    }

    /// Transport failures (connection refused, reset, ...) as opposed to a status answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, SrbError::Http(e) if !e.is_decode() && !e.is_status())
    }
}

pub type Result<T> = std::result::Result<T, SrbError>;
