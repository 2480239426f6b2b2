//! Testing utilities including a mock generator.
//!
//! Useful for exercising the pipeline without real API calls. Clones share
//! state, so keep one handle outside the pipeline to assert on calls.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{ApiError, ApiResult};
use crate::traits::generator::Generator;

/// One call made to the mock, with the full prompts as sent.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub system: String,
    pub user: String,
}

/// A scripted [`Generator`] for tests.
///
/// Responses are consumed in the order they were queued; once exhausted,
/// further calls return [`ApiError::EmptyResponse`].
#[derive(Clone, Default)]
pub struct MockGenerator {
    responses: Arc<Mutex<VecDeque<ApiResult<String>>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockGenerator {
    /// Create a mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    /// Queue a failed call.
    pub fn with_error(self, err: ApiError) -> Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    /// All calls made so far.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, system: &str, user: &str) -> ApiResult<String> {
        self.calls.lock().unwrap().push(MockCall {
            system: system.to_string(),
            user: user.to_string(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ApiError::EmptyResponse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_replays_in_order() {
        let mock = MockGenerator::new()
            .with_response("first")
            .with_error(ApiError::RateLimited)
            .with_response("second");

        assert_eq!(mock.generate("s", "u").await.unwrap(), "first");
        assert!(mock.generate("s", "u").await.unwrap_err().is_rate_limit());
        assert_eq!(mock.generate("s", "u").await.unwrap(), "second");

        // Exhausted
        assert!(matches!(
            mock.generate("s", "u").await,
            Err(ApiError::EmptyResponse)
        ));
        assert_eq!(mock.call_count(), 4);
    }

    #[tokio::test]
    async fn test_clones_share_call_history() {
        let mock = MockGenerator::new().with_response("ok");
        let clone = mock.clone();
        clone.generate("system", "user").await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system, "system");
        assert_eq!(calls[0].user, "user");
    }
}
