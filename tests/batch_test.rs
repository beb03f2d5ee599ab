//! Integration tests for directory batch processing.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use docoutline::batch::run_batch_with_progress;
use docoutline::{
    run_batch, BatchOptions, DocumentResult, JsonFormat, OutlineOptions, UniversalResult,
};

const MANUAL: &str = r#"{
    "metadata": { "title": "Operator Manual" },
    "toc": [
        { "level": 1, "title": "Safety", "page": 1 },
        { "level": 2, "title": "Warnings", "page": 2 }
    ],
    "pages": [
        { "number": 1, "width": 612, "height": 792, "text": "Operator Manual" },
        { "number": 2, "width": 612, "height": 792, "text": "| Part | Torque |" }
    ]
}"#;

const MEMO: &str = r#"{
    "pages": [ { "number": 1, "width": 612, "height": 792,
        "blocks": [ { "lines": [ { "spans": [
            { "text": "Quarterly Memo", "bbox": [72, 60, 400, 80], "size": 20, "font": "Arial-Bold" }
        ] } ] } ] } ]
}"#;

fn setup() -> (tempfile::TempDir, tempfile::TempDir) {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(input.path().join("manual.json"), MANUAL).unwrap();
    fs::write(input.path().join("memo.json"), MEMO).unwrap();
    fs::write(input.path().join("broken.json"), "{ not a dump").unwrap();
    fs::write(input.path().join("readme.txt"), "ignored").unwrap();
    (input, output)
}

fn read<T: serde::de::DeserializeOwned>(path: &Path) -> T {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn options() -> BatchOptions {
    BatchOptions::new().with_outline_options(OutlineOptions::new().with_language("en"))
}

#[test]
fn test_one_record_per_input() {
    let (input, output) = setup();
    let report = run_batch(input.path(), output.path(), &options()).unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!(report.degraded, 1);
    for stem in ["broken", "manual", "memo"] {
        assert!(output.path().join(format!("{}.json", stem)).exists());
    }
    assert!(!output.path().join("readme.json").exists());

    let manual: DocumentResult = read(&output.path().join("manual.json"));
    assert_eq!(manual.title, "Operator Manual");
    assert_eq!(manual.outline.len(), 2);
}

#[test]
fn test_invalid_dump_yields_placeholder() {
    let (input, output) = setup();
    run_batch(input.path(), output.path(), &options()).unwrap();

    let broken: DocumentResult = read(&output.path().join("broken.json"));
    assert_eq!(broken, DocumentResult::placeholder("broken"));
}

#[test]
fn test_universal_records() {
    let (input, output) = setup();
    let options = options().universal().with_format(JsonFormat::Compact);
    let report = run_batch(input.path(), output.path(), &options).unwrap();

    assert_eq!(report.processed, 3);
    let manual: UniversalResult = read(&output.path().join("manual_universal.json"));
    assert_eq!(manual.title, "Operator Manual");
    assert_eq!(manual.structure.pages, 2);
    assert!(manual.structure.has_tables);

    let broken: UniversalResult = read(&output.path().join("broken_universal.json"));
    assert_eq!(broken.structure.pages, 0);
    assert!(broken.content.is_empty());
}

#[test]
fn test_sequential_matches_parallel() {
    let (input, parallel_out) = setup();
    let sequential_out = tempfile::tempdir().unwrap();

    run_batch(input.path(), parallel_out.path(), &options()).unwrap();
    run_batch(input.path(), sequential_out.path(), &options().sequential()).unwrap();

    for stem in ["broken", "manual", "memo"] {
        let name = format!("{}.json", stem);
        assert_eq!(
            fs::read_to_string(parallel_out.path().join(&name)).unwrap(),
            fs::read_to_string(sequential_out.path().join(&name)).unwrap()
        );
    }
}

#[test]
fn test_progress_called_per_record() {
    let (input, output) = setup();
    let seen = Mutex::new(Vec::new());
    let progress = |path: &Path| seen.lock().unwrap().push(path.to_path_buf());

    let report = run_batch_with_progress(input.path(), output.path(), &options(), &progress).unwrap();

    let mut seen = seen.into_inner().unwrap();
    seen.sort();
    assert_eq!(seen, report.written);
}

#[test]
fn test_missing_input_dir_is_an_error() {
    let output = tempfile::tempdir().unwrap();
    let result = run_batch(Path::new("/nonexistent/dumps"), output.path(), &options());
    assert!(result.is_err());
}

fn titled_dump(title: &str) -> String {
    format!(
        r#"{{
    "pages": [ {{ "number": 1, "width": 612, "height": 792,
        "blocks": [ {{ "lines": [ {{ "spans": [
            {{ "text": "{t}", "bbox": [100, 40, 500, 64], "size": 24, "font": "Georgia-Bold" }}
        ] }} ] }} ],
        "layout": [ {{ "type": "title", "bbox": [100, 40, 500, 64], "text": "{t}" }} ] }} ]
}}"#,
        t = title
    )
}

#[test]
fn test_inputs_sharing_a_stem_stay_separate() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(input.path().join("a.JSON"), titled_dump("Alpha Field Guide")).unwrap();
    fs::write(input.path().join("a.json"), titled_dump("Beta Field Guide")).unwrap();

    let report = run_batch(input.path(), output.path(), &options()).unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(report.degraded, 0);
    assert_eq!(
        report.written,
        vec![output.path().join("a_JSON.json"), output.path().join("a_json.json")]
    );

    let upper: DocumentResult = read(&output.path().join("a_JSON.json"));
    let lower: DocumentResult = read(&output.path().join("a_json.json"));
    assert_eq!(upper.title, "Alpha Field Guide");
    assert_eq!(lower.title, "Beta Field Guide");
}
