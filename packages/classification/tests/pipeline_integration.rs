//! End-to-end pipeline tests against the mock generator.

use std::path::PathBuf;
use std::time::Duration;

use classification::datasets::vignettes::VignetteCategory;
use classification::testing::MockGenerator;
use classification::{
    ApiError, Category, Classification, Item, Pipeline, PipelineConfig, ProgressStore,
    ResponseFormat, RetryPolicy,
};

/// Minimal item type: free-text scenarios classified through the JSON
/// contract into the vignette category set.
#[derive(Clone)]
struct Scenario {
    text: String,
}

impl Scenario {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl Item for Scenario {
    type Category = VignetteCategory;

    const SYSTEM_PROMPT: &'static str = "Classify each scenario. Respond with a JSON array.";
    const RESPONSE_FORMAT: ResponseFormat = ResponseFormat::JsonArray;

    fn prompt_block(&self) -> String {
        self.text.clone()
    }

    fn tsv_header() -> &'static [&'static str] {
        &["scenario", "category"]
    }

    fn tsv_row(&self, category: Self::Category) -> Vec<String> {
        vec![self.text.clone(), category.as_str().to_string()]
    }
}

struct TestRun {
    _dir: tempfile::TempDir,
    config: PipelineConfig,
}

impl TestRun {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::new(
            dir.path().join("source.json"),
            dir.path().join("progress.jsonl"),
            dir.path().join("out.tsv"),
        )
        .with_batch_size(2)
        .with_retry(RetryPolicy::new(3, Duration::ZERO));
        Self { _dir: dir, config }
    }

    fn output(&self) -> String {
        std::fs::read_to_string(&self.config.output_path).unwrap()
    }

    fn progress_lines(&self) -> usize {
        std::fs::read_to_string(&self.config.progress_path)
            .unwrap()
            .lines()
            .count()
    }
}

fn three_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new("Pregnant woman with eclampsia"),
        Scenario::new("Man with chest pain"),
        Scenario::new("Woman seeking family planning advice"),
    ]
}

#[tokio::test]
async fn test_three_items_two_batches_exports_two_rows() {
    let run = TestRun::new();
    let mock = MockGenerator::new()
        .with_response(r#"[{"is_obgyn": true, "category": "MATERNAL"}, {"is_obgyn": false, "category": "NONE"}]"#)
        .with_response(r#"[{"is_obgyn": true, "category": "SRH"}]"#);

    let summary = Pipeline::new(three_scenarios(), mock.clone(), run.config.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(mock.call_count(), 2);
    assert_eq!(summary.batches, 2);
    assert_eq!(summary.newly_classified, 3);
    assert_eq!(summary.export.exported, 2);

    let lines: Vec<String> = run.output().lines().map(String::from).collect();
    assert_eq!(lines.len(), 3); // header + items 0 and 2
    assert!(lines[1].contains("eclampsia") && lines[1].ends_with("MATERNAL"));
    assert!(lines[2].contains("family planning") && lines[2].ends_with("SRH"));

    // Each item recorded exactly once
    assert_eq!(run.progress_lines(), 3);
}

#[tokio::test]
async fn test_rerun_over_full_store_makes_no_api_calls() {
    let run = TestRun::new();
    let mock = MockGenerator::new()
        .with_response(r#"[{"is_obgyn": true, "category": "MATERNAL"}, {"is_obgyn": false, "category": "NONE"}]"#)
        .with_response(r#"[{"is_obgyn": true, "category": "SRH"}]"#);

    Pipeline::new(three_scenarios(), mock, run.config.clone())
        .run()
        .await
        .unwrap();
    let first_export = run.output();

    // Second run: nothing scripted, so any call would fail loudly
    let idle = MockGenerator::new();
    let summary = Pipeline::new(three_scenarios(), idle.clone(), run.config.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(idle.call_count(), 0);
    assert_eq!(summary.batches, 0);
    assert_eq!(summary.already_classified, 3);
    assert_eq!(summary.newly_classified, 0);
    assert_eq!(run.output(), first_export);
    assert_eq!(run.progress_lines(), 3);
}

#[tokio::test]
async fn test_resumes_from_partial_store() {
    let run = TestRun::new();

    // Items [0, 2) already classified by an earlier run
    let store = ProgressStore::open(&run.config.progress_path);
    let mut writer = store.appender().unwrap();
    writer
        .append(&Classification::new(0, true, VignetteCategory::Maternal))
        .unwrap();
    writer
        .append(&Classification::new(1, false, VignetteCategory::None))
        .unwrap();
    drop(writer);

    let mock =
        MockGenerator::new().with_response(r#"[{"is_obgyn": true, "category": "SRH"}]"#);
    let summary = Pipeline::new(three_scenarios(), mock.clone(), run.config.clone())
        .run()
        .await
        .unwrap();

    // Exactly one batch for the single pending item
    assert_eq!(mock.call_count(), 1);
    assert_eq!(summary.already_classified, 2);
    assert_eq!(summary.newly_classified, 1);

    let calls = mock.calls();
    assert!(calls[0].user.contains("family planning"));
    assert!(!calls[0].user.contains("eclampsia"));
    assert!(!calls[0].user.contains("chest pain"));

    // Prior records untouched, new record appended
    assert_eq!(run.progress_lines(), 3);
    assert_eq!(summary.export.exported, 2);
}

#[tokio::test]
async fn test_failing_batch_degrades_and_run_continues() {
    let run = TestRun::new();

    // First batch fails all 3 attempts with a non-rate-limit error;
    // second batch succeeds.
    let mock = MockGenerator::new()
        .with_error(ApiError::Status {
            status: 500,
            message: "internal".into(),
        })
        .with_error(ApiError::Status {
            status: 500,
            message: "internal".into(),
        })
        .with_error(ApiError::Status {
            status: 500,
            message: "internal".into(),
        })
        .with_response(r#"[{"is_obgyn": true, "category": "SRH"}]"#);

    let summary = Pipeline::new(three_scenarios(), mock.clone(), run.config.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(mock.call_count(), 4);
    assert_eq!(summary.newly_classified, 3);

    // The degraded batch produced exactly B = 2 ERROR records
    let done = ProgressStore::open(&run.config.progress_path)
        .load::<VignetteCategory>()
        .unwrap();
    assert_eq!(done[&0].category, VignetteCategory::Error);
    assert_eq!(done[&1].category, VignetteCategory::Error);
    assert_eq!(done[&2].category, VignetteCategory::Srh);

    assert_eq!(summary.export.exported, 1);
    assert_eq!(summary.export.failed_idxs, vec![0, 1]);
}

#[tokio::test]
async fn test_exported_cells_never_contain_raw_newlines() {
    let run = TestRun::new();
    let items = vec![Scenario::new("First line\nsecond line\r\nthird line")];

    let mock = MockGenerator::new()
        .with_response(r#"[{"is_obgyn": true, "category": "CHILD_HEALTH"}]"#);
    Pipeline::new(items, mock, run.config.clone())
        .run()
        .await
        .unwrap();

    let output = run.output();
    assert_eq!(output.lines().count(), 2);
    assert!(output.contains("First line\\nsecond line\\nthird line"));
}

#[tokio::test]
async fn test_unwritable_export_destination_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig::new(
        dir.path().join("source.json"),
        dir.path().join("progress.jsonl"),
        // a directory cannot be created as a file
        PathBuf::from(dir.path()),
    )
    .with_batch_size(2);

    let mock = MockGenerator::new()
        .with_response(r#"[{"is_obgyn": false, "category": "NONE"}]"#);
    let err = Pipeline::new(vec![Scenario::new("x")], mock, config)
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, classification::PipelineError::Sink(_)));
}
