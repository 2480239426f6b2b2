//! Classifier client - one prompt, one generation call, one result per item.
//!
//! The response mapping is positional: the i-th parsed entry labels the i-th
//! batch member as sent. Anything the response is missing, or any entry that
//! cannot be parsed, becomes an explicit `PARSE_FAIL` record rather than an
//! error; only the API call itself failing surfaces as an `ApiError`, and
//! retrying that is the retry controller's job, not this module's.

use regex::Regex;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::traits::generator::Generator;
use crate::traits::item::{Category, Item, ResponseFormat};
use crate::types::classification::Classification;

/// Classifies batches of items through a [`Generator`].
pub struct BatchClassifier<G> {
    generator: G,
}

impl<G: Generator> BatchClassifier<G> {
    /// Create a classifier over the given generation service.
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Classify one batch with a single generation call.
    ///
    /// Never fails on response content; a malformed or short response yields
    /// `PARSE_FAIL` records for the affected members.
    pub async fn classify<I: Item>(
        &self,
        batch: &[(usize, &I)],
    ) -> ApiResult<Vec<Classification<I::Category>>> {
        let user = render_batch_prompt(batch);
        let response = self.generator.generate(I::SYSTEM_PROMPT, &user).await?;
        let entries = parse_entries::<I::Category>(&response, I::RESPONSE_FORMAT);

        Ok(batch
            .iter()
            .enumerate()
            .map(|(local, (idx, _))| match entries.get(local) {
                Some(&(is_obgyn, category)) => Classification::new(*idx, is_obgyn, category),
                None => Classification::new(*idx, false, I::Category::PARSE_FAIL),
            })
            .collect())
    }
}

/// Render a batch into one user message, each member under a local marker.
pub fn render_batch_prompt<I: Item>(batch: &[(usize, &I)]) -> String {
    batch
        .iter()
        .enumerate()
        .map(|(local, (_, item))| format!("[{}] {}", local, item.prompt_block()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Strip a surrounding markdown code fence, if any.
fn strip_code_fence(text: &str) -> &str {
    text.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Parse a response into ordered `(decision, category)` entries.
///
/// A response that fails to parse entirely yields zero entries, which the
/// positional mapping turns into all-`PARSE_FAIL` records.
fn parse_entries<C: Category>(response: &str, format: ResponseFormat) -> Vec<(bool, C)> {
    let text = strip_code_fence(response);
    match format {
        ResponseFormat::JsonArray => parse_json_entries(text),
        ResponseFormat::DelimitedLines => parse_delimited_entries(text),
    }
}

#[derive(Deserialize)]
struct RawEntry {
    #[serde(default)]
    is_obgyn: bool,
    #[serde(default)]
    category: Option<String>,
}

fn parse_json_entries<C: Category>(text: &str) -> Vec<(bool, C)> {
    let raw: Vec<RawEntry> = match serde_json::from_str(text) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(error = %err, "unparseable classification response");
            return Vec::new();
        }
    };

    raw.into_iter()
        .map(|entry| {
            match entry.category.as_deref().and_then(C::parse) {
                Some(category) => (entry.is_obgyn, category),
                // Missing or unknown label: the entry is unusable
                None => (false, C::PARSE_FAIL),
            }
        })
        .collect()
}

fn parse_delimited_entries<C: Category>(text: &str) -> Vec<(bool, C)> {
    let pattern = Regex::new(r"^\s*(\d+)\s*\|\s*(YES|NO)\s*\|\s*([A-Z_]+)").expect("valid pattern");

    text.lines()
        .filter_map(|line| {
            let line = line.trim().to_uppercase();
            pattern.captures(&line).map(|caps| {
                let decision = &caps[2] == "YES";
                match C::parse(&caps[3]) {
                    Some(category) => (decision, category),
                    None => (false, C::PARSE_FAIL),
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::usmle::UsmleCategory;
    use crate::datasets::vignettes::VignetteCategory;
    use crate::error::ApiError;
    use crate::testing::MockGenerator;

    fn question(text: &str) -> crate::datasets::usmle::UsmleQuestion {
        serde_json::from_str(&format!(
            "{{\"question\":\"{text}\",\"options\":{{\"A\":\"yes\",\"B\":\"no\"}},\"answer\":\"A\"}}"
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_classify_maps_positionally() {
        let mock = MockGenerator::new().with_response(
            r#"[{"id": 0, "is_obgyn": true, "category": "OBSTETRICS"},
                {"id": 1, "is_obgyn": false, "category": "NONE"}]"#,
        );
        let classifier = BatchClassifier::new(mock.clone());

        let (a, b) = (question("q1"), question("q2"));
        let batch = vec![(10, &a), (11, &b)];
        let records = classifier.classify(&batch).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].idx, 10);
        assert_eq!(records[0].category, UsmleCategory::Obstetrics);
        assert!(records[0].is_obgyn);
        assert_eq!(records[1].idx, 11);
        assert!(!records[1].is_obgyn);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_short_response_marks_trailing_parse_fail() {
        let mock = MockGenerator::new()
            .with_response(r#"[{"id": 0, "is_obgyn": true, "category": "GYNECOLOGY"}]"#);
        let classifier = BatchClassifier::new(mock);

        let (a, b) = (question("q1"), question("q2"));
        let batch = vec![(0, &a), (1, &b)];
        let records = classifier.classify(&batch).await.unwrap();

        assert_eq!(records[0].category, UsmleCategory::Gynecology);
        assert_eq!(records[1].category, UsmleCategory::ParseFail);
        assert!(!records[1].is_obgyn);
    }

    #[tokio::test]
    async fn test_fenced_response_is_accepted() {
        let mock = MockGenerator::new().with_response(
            "```json\n[{\"id\": 0, \"is_obgyn\": true, \"category\": \"REPRODUCTIVE_HEALTH\"}]\n```",
        );
        let classifier = BatchClassifier::new(mock);

        let a = question("q1");
        let batch = vec![(0, &a)];
        let records = classifier.classify(&batch).await.unwrap();
        assert_eq!(records[0].category, UsmleCategory::ReproductiveHealth);
    }

    #[tokio::test]
    async fn test_garbage_response_marks_all_parse_fail() {
        let mock = MockGenerator::new().with_response("I cannot classify these questions.");
        let classifier = BatchClassifier::new(mock);

        let (a, b) = (question("q1"), question("q2"));
        let batch = vec![(0, &a), (1, &b)];
        let records = classifier.classify(&batch).await.unwrap();
        assert!(records
            .iter()
            .all(|r| r.category == UsmleCategory::ParseFail && !r.is_obgyn));
    }

    #[tokio::test]
    async fn test_unknown_category_marks_parse_fail() {
        let mock = MockGenerator::new()
            .with_response(r#"[{"id": 0, "is_obgyn": true, "category": "CARDIOLOGY"}]"#);
        let classifier = BatchClassifier::new(mock);

        let a = question("q1");
        let batch = vec![(0, &a)];
        let records = classifier.classify(&batch).await.unwrap();
        assert_eq!(records[0].category, UsmleCategory::ParseFail);
    }

    #[tokio::test]
    async fn test_api_failure_propagates() {
        let mock = MockGenerator::new().with_error(ApiError::RateLimited);
        let classifier = BatchClassifier::new(mock);

        let a = question("q1");
        let batch = vec![(0, &a)];
        let err = classifier.classify(&batch).await.unwrap_err();
        assert!(err.is_rate_limit());
    }

    #[test]
    fn test_delimited_parse() {
        let text = "0|YES|MATERNAL\n1|no|none\n2 | YES | CHILD_HEALTH";
        let entries = parse_entries::<VignetteCategory>(text, ResponseFormat::DelimitedLines);

        assert_eq!(
            entries,
            vec![
                (true, VignetteCategory::Maternal),
                (false, VignetteCategory::None),
                (true, VignetteCategory::ChildHealth),
            ]
        );
    }

    #[test]
    fn test_delimited_parse_skips_noise_lines() {
        let text = "Here are the classifications:\n0|YES|SRH\nThat is all.";
        let entries = parse_entries::<VignetteCategory>(text, ResponseFormat::DelimitedLines);
        assert_eq!(entries, vec![(true, VignetteCategory::Srh)]);
    }

    #[test]
    fn test_delimited_unknown_category_is_parse_fail() {
        let text = "0|YES|SURGERY";
        let entries = parse_entries::<VignetteCategory>(text, ResponseFormat::DelimitedLines);
        assert_eq!(entries, vec![(false, VignetteCategory::ParseFail)]);
    }

    #[test]
    fn test_render_batch_prompt_numbers_locally() {
        let (a, b) = (question("first"), question("second"));
        let batch = vec![(40, &a), (41, &b)];
        let prompt = render_batch_prompt(&batch);

        assert!(prompt.starts_with("[0] first"));
        assert!(prompt.contains("\n\n[1] second"));
        // Global indices never leak into the prompt
        assert!(!prompt.contains("[40]"));
    }
}
