//! Progress reporting port for front-end integration.

/// Events emitted during a run for progress tracking.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Classification is starting.
    Started {
        /// Items loaded from the source.
        total: usize,
        /// Items the progress store already covers.
        already_classified: usize,
        /// Batches about to be classified.
        batches: usize,
    },
    /// One batch finished (classified, degraded, or parse-failed).
    BatchClassified {
        /// 1-based batch number.
        batch: usize,
        /// Total batches in this run.
        batches: usize,
        /// Records appended for this batch.
        classified: usize,
        /// Positive classifications in this batch.
        positive: usize,
        /// Failure-marker records in this batch.
        failed: usize,
    },
    /// The export has been written.
    Finished {
        /// Records appended during this run.
        newly_classified: usize,
        /// Rows written to the export.
        exported: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}
