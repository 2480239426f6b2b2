//! Classification pipeline - the core of the library.
//!
//! One run moves through load → classify pending batches → export:
//! - the progress store decides which items still need classification,
//! - batches go to the generation API one at a time, in source order,
//!   guarded by the retry controller and paced between calls,
//! - every outcome is appended to the store before the next batch starts,
//! - the export joins the full store back over the source sequence.
//!
//! Interrupting a run loses at most the in-flight batch; re-invoking the
//! pipeline resumes from the store. A store that already covers every item
//! short-circuits straight to the export with zero API calls.

pub mod batch;
pub mod classify;
pub mod export;
pub mod progress;
pub mod retry;

use std::collections::HashSet;

use governor::{Quota, RateLimiter};

use crate::error::Result;
use crate::traits::generator::Generator;
use crate::traits::item::{Category, Item};
use crate::traits::progress::{ProgressEvent, ProgressSink};
use crate::types::config::PipelineConfig;

pub use batch::pending_batches;
pub use classify::BatchClassifier;
pub use export::{export_tsv, ExportSummary};
pub use progress::{ProgressStore, ProgressWriter};
pub use retry::classify_with_retry;

type Pacer = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Outcome of one pipeline run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Items loaded from the source.
    pub total: usize,

    /// Items the progress store already covered at startup.
    pub already_classified: usize,

    /// Records appended during this run.
    pub newly_classified: usize,

    /// Batches classified during this run.
    pub batches: usize,

    /// What the export pass wrote.
    pub export: ExportSummary,
}

/// A resumable batch-classification run over one dataset.
pub struct Pipeline<I: Item, G> {
    items: Vec<I>,
    classifier: BatchClassifier<G>,
    store: ProgressStore,
    config: PipelineConfig,
    sink: Option<Box<dyn ProgressSink>>,
}

impl<I: Item, G: Generator> Pipeline<I, G> {
    /// Create a pipeline over already-loaded items.
    pub fn new(items: Vec<I>, generator: G, config: PipelineConfig) -> Self {
        let store = ProgressStore::open(&config.progress_path);
        Self {
            items,
            classifier: BatchClassifier::new(generator),
            store,
            config,
            sink: None,
        }
    }

    /// Attach a progress sink (e.g. a terminal progress bar).
    pub fn with_progress(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(sink) = &self.sink {
            sink.on_event(event);
        }
    }

    /// Run to completion: classify everything pending, then export.
    pub async fn run(&self) -> Result<RunSummary> {
        self.config.validate()?;

        let done = self.store.load::<I::Category>()?;
        let done_idxs: HashSet<usize> = done.keys().copied().collect();

        let batches = pending_batches(&self.items, &done_idxs, self.config.batch_size);
        let n_batches = batches.len();
        let pending: usize = batches.iter().map(|b| b.len()).sum();
        let already_classified = self.items.len() - pending;

        tracing::info!(
            total = self.items.len(),
            already_classified,
            pending,
            batches = n_batches,
            "starting classification run"
        );
        self.emit(ProgressEvent::Started {
            total: self.items.len(),
            already_classified,
            batches: n_batches,
        });

        let mut newly_classified = 0;
        if batches.is_empty() {
            tracing::info!("all items already classified, skipping to export");
        } else {
            let pacer: Option<Pacer> =
                Quota::with_period(self.config.batch_interval).map(RateLimiter::direct);
            let mut writer = self.store.appender()?;

            for (num, batch) in batches.iter().enumerate() {
                if let Some(pacer) = &pacer {
                    pacer.until_ready().await;
                }

                let first = batch.first().map(|(idx, _)| *idx).unwrap_or_default();
                let last = batch.last().map(|(idx, _)| *idx).unwrap_or_default();

                let records =
                    classify_with_retry(&self.classifier, batch, &self.config.retry).await;

                let positive = records.iter().filter(|r| r.is_obgyn).count();
                let failed = records.iter().filter(|r| r.category.is_failure()).count();

                for record in &records {
                    writer.append(record)?;
                }
                newly_classified += records.len();

                tracing::info!(
                    batch = num + 1,
                    batches = n_batches,
                    range = %format!("q-{first}..q-{last}"),
                    classified = records.len(),
                    positive,
                    failed,
                    "batch classified"
                );
                self.emit(ProgressEvent::BatchClassified {
                    batch: num + 1,
                    batches: n_batches,
                    classified: records.len(),
                    positive,
                    failed,
                });
            }
        }

        // The export reads the full store back rather than trusting the
        // in-memory view, so it sees exactly what a resumed run would.
        let done = self.store.load::<I::Category>()?;
        let export = export_tsv(&self.items, &done, &self.config.output_path)?;

        tracing::info!(
            exported = export.exported,
            total = export.total,
            "export written"
        );
        self.emit(ProgressEvent::Finished {
            newly_classified,
            exported: export.exported,
        });

        Ok(RunSummary {
            total: self.items.len(),
            already_classified,
            newly_classified,
            batches: n_batches,
            export,
        })
    }
}
