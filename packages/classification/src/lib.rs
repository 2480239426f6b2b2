//! Resumable Batch Topic Classification
//!
//! A library for one-shot dataset extraction driven by an LLM classifier:
//! load an ordered dataset, classify every item in fixed-size batches
//! against a text-generation API, and export the positive subset as TSV.
//!
//! # Design Philosophy
//!
//! **One bad batch never kills the run.**
//!
//! - Every item ends with an explicit recorded outcome - a topic label, the
//!   null category, or a failure marker
//! - Classification outcomes append to a durable progress store, so an
//!   interrupted run resumes where it stopped and a completed run re-exports
//!   without a single API call
//! - API failures are typed values inspected by the retry controller, not
//!   exceptions caught somewhere up the stack
//! - The pipeline is generic over the dataset and the generation service;
//!   both are trait seams with mock implementations for tests
//!
//! # Usage
//!
//! ```rust,ignore
//! use classification::{datasets::usmle, Gemini, Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::new("qbank.jsonl", "progress.jsonl", "out.tsv")
//!     .with_batch_size(100);
//! let questions = usmle::load(config.source_path())?;
//! let summary = Pipeline::new(questions, Gemini::from_env()?, config)
//!     .run()
//!     .await?;
//! println!("exported {} of {}", summary.export.exported, summary.total);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (Generator, Item, ProgressSink)
//! - [`types`] - Classification records and configuration
//! - [`pipeline`] - Batcher, progress store, classifier, retry, export
//! - [`datasets`] - Loaders and item implementations per dataset
//! - [`ai`] - Generation service implementations (Gemini)
//! - [`security`] - Credential handling
//! - [`testing`] - Mock implementations for tests

pub mod ai;
pub mod datasets;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod security;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{ApiError, PipelineError, SinkError, SourceError, StoreError};
pub use traits::{
    generator::Generator,
    item::{Category, Item, ResponseFormat},
    progress::{ProgressEvent, ProgressSink},
};
pub use types::{
    classification::Classification,
    config::{PipelineConfig, RetryPolicy},
};

// Re-export pipeline components
pub use pipeline::{
    classify_with_retry, export_tsv, pending_batches, BatchClassifier, ExportSummary, Pipeline,
    ProgressStore, ProgressWriter, RunSummary,
};

// Re-export the Gemini client
pub use ai::gemini::{Gemini, DEFAULT_MODEL};
