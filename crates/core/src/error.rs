use thiserror::Error;

/// Failure of a whole network query invocation.
///
/// An empty query result is never an error: it yields the seed fallback
/// (egocentric) or an empty graph (sociocentric).
#[derive(Error, Debug)]
pub enum BuilderError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Source query failed: {0}")]
    Source(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Metric computation failed: {0}")]
    Metrics(String),
}

pub type BuilderResult<T> = Result<T, BuilderError>;
