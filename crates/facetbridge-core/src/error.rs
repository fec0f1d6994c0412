use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The executor (or the transport behind it) failed; the whole request fails.
    #[error("Query execution failed: {0:#}")]
    Executor(anyhow::Error),

    #[error("Malformed engine response: {0}")]
    MalformedResponse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
