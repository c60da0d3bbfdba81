use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Wrong key, missing key, or a body that did not parse at all. All three
    /// are reported identically so a probing client cannot tell which check
    /// failed.
    #[error("Invalid API key")]
    Unauthorized,

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid {field}: {value}")]
    InvalidCoordinate { field: &'static str, value: String },

    /// Unexpected fault. The source is logged server-side; callers only ever
    /// see the generic message.
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
