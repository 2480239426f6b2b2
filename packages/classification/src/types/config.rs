//! Configuration for the classification pipeline.
//!
//! The original extraction scripts read everything from module-level globals
//! and process environment; here every knob is an explicit field constructed
//! by the caller and passed into the pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::PipelineError;

/// Retry behavior around one batch classification call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per batch, including the first.
    pub max_attempts: u32,

    /// Rate-limit backoff grows linearly: `backoff_base * attempt`.
    pub backoff_base: Duration,
}

impl RetryPolicy {
    /// Create a new retry policy.
    pub fn new(max_attempts: u32, backoff_base: Duration) -> Self {
        Self {
            max_attempts,
            backoff_base,
        }
    }

    /// Backoff before the attempt following `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff_base * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_base: Duration::from_secs(30),
        }
    }
}

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Dataset to classify.
    pub source_path: PathBuf,

    /// Append-only progress store (created on first run).
    pub progress_path: PathBuf,

    /// TSV destination.
    pub output_path: PathBuf,

    /// Maximum items per generation call.
    pub batch_size: usize,

    /// Fixed delay between consecutive batch calls; zero disables pacing.
    pub batch_interval: Duration,

    /// Retry behavior per batch.
    pub retry: RetryPolicy,
}

impl PipelineConfig {
    /// Create a config with default batching (100 per call, no pacing).
    pub fn new(
        source_path: impl Into<PathBuf>,
        progress_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            progress_path: progress_path.into(),
            output_path: output_path.into(),
            batch_size: 100,
            batch_interval: Duration::ZERO,
            retry: RetryPolicy::default(),
        }
    }

    /// Set the batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the inter-batch delay.
    pub fn with_batch_interval(mut self, interval: Duration) -> Self {
        self.batch_interval = interval;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The source path.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.batch_size == 0 {
            return Err(PipelineError::Config {
                reason: "batch_size must be at least 1".into(),
            });
        }
        if self.retry.max_attempts == 0 {
            return Err(PipelineError::Config {
                reason: "retry.max_attempts must be at least 1".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = PipelineConfig::new("in.jsonl", "progress.jsonl", "out.tsv");
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.batch_interval, Duration::ZERO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_batch_size() {
        let config =
            PipelineConfig::new("in.jsonl", "progress.jsonl", "out.tsv").with_batch_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let config = PipelineConfig::new("in.jsonl", "progress.jsonl", "out.tsv")
            .with_retry(RetryPolicy::new(0, Duration::ZERO));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_linear_backoff() {
        let policy = RetryPolicy::new(5, Duration::from_secs(30));
        assert_eq!(policy.delay_after(1), Duration::from_secs(30));
        assert_eq!(policy.delay_after(3), Duration::from_secs(90));
    }
}
