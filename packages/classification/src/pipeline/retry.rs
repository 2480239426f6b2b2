//! Retry controller - bounded retries with whole-batch degradation.
//!
//! One bad batch must not block classification of all subsequent batches:
//! after the final attempt the entire batch is recorded as `ERROR` results
//! instead of propagating the failure up and aborting the run.

use crate::pipeline::classify::BatchClassifier;
use crate::traits::generator::Generator;
use crate::traits::item::{Category, Item};
use crate::types::classification::Classification;
use crate::types::config::RetryPolicy;

/// Classify one batch with bounded retries.
///
/// Rate-limit failures wait `backoff_base * attempt` before the next try;
/// other API failures retry immediately. Exhausting the policy degrades the
/// batch to `ERROR`-category records for every member. Infallible by design.
pub async fn classify_with_retry<I: Item, G: Generator>(
    classifier: &BatchClassifier<G>,
    batch: &[(usize, &I)],
    policy: &RetryPolicy,
) -> Vec<Classification<I::Category>> {
    for attempt in 1..=policy.max_attempts {
        match classifier.classify(batch).await {
            Ok(records) => return records,
            Err(err) if attempt == policy.max_attempts => {
                tracing::warn!(
                    error = %err,
                    attempts = policy.max_attempts,
                    batch_size = batch.len(),
                    "giving up on batch, recording error results"
                );
            }
            Err(err) if err.is_rate_limit() => {
                let wait = policy.delay_after(attempt);
                tracing::warn!(
                    attempt,
                    wait_secs = wait.as_secs(),
                    "rate limited, backing off"
                );
                tokio::time::sleep(wait).await;
            }
            Err(err) => {
                tracing::warn!(attempt, error = %err, "classification call failed, retrying");
            }
        }
    }

    batch
        .iter()
        .map(|(idx, _)| Classification::new(*idx, false, I::Category::ERROR))
        .collect()
}
