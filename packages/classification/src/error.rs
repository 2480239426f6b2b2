//! Typed errors for the classification pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Failure severity follows the
//! pipeline's propagation policy: source, store, and sink errors abort a run;
//! API errors are transient and handled by the retry layer; per-item parse
//! problems are never errors at all, they become `PARSE_FAIL` records.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Source dataset missing or unreadable
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Progress store could not be read or written
    #[error("progress store error: {0}")]
    Store(#[from] StoreError),

    /// Export destination unwritable
    #[error("export error: {0}")]
    Sink(#[from] SinkError),

    /// Invalid pipeline configuration
    #[error("config error: {reason}")]
    Config { reason: String },
}

/// Errors reading a source dataset.
#[derive(Debug, Error)]
pub enum SourceError {
    /// File missing or unreadable
    #[error("cannot read source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record failed to deserialize
    #[error("malformed record at {path}:{line}: {source}")]
    Malformed {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors touching the progress store file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File unreadable or unwritable
    #[error("cannot access progress store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted record failed to deserialize
    #[error("malformed progress record at {path}:{line}: {source}")]
    Malformed {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A record failed to serialize (programming error in practice)
    #[error("cannot encode progress record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors writing the export file.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cannot write export {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures of a single generation API call.
///
/// Returned by [`crate::traits::generator::Generator`] implementations and
/// inspected explicitly by the retry controller; rate-limit failures back
/// off, everything else retries identically.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service refused the call with a rate-limit response
    #[error("rate limited by the generation API")]
    RateLimited,

    /// Transport-level failure (connect, timeout, body decode)
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status from the service
    #[error("generation API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The call succeeded but carried no usable text
    #[error("generation API returned no text")]
    EmptyResponse,
}

impl ApiError {
    /// Whether this failure should be treated as a rate limit.
    ///
    /// Covers both a proper 429 and quota-exhaustion messages some services
    /// return under other statuses.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            Self::RateLimited => true,
            Self::Status { message, .. } => message.contains("RESOURCE_EXHAUSTED"),
            _ => false,
        }
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for generation API calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
