//! Generator trait for the external text-generation service.

use async_trait::async_trait;

use crate::error::ApiResult;

/// A text-generation service invoked once per batch.
///
/// Implementations wrap a specific provider and make exactly one outbound
/// call per invocation; retries belong to the retry controller, not here.
/// Failures come back as typed [`crate::error::ApiError`] values so the
/// caller can distinguish rate limiting from everything else.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for the given system instruction and user
    /// message.
    async fn generate(&self, system: &str, user: &str) -> ApiResult<String>;
}
