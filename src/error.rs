use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success answer from the generation endpoint.
    #[error("Upstream error {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Invalid API key")]
    Unauthorized,

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("No cook session found: {0}")]
    SessionNotFound(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Job cancelled: {0}")]
    Cancelled(String),
}

pub type Result<T> = std::result::Result<T, Error>;
