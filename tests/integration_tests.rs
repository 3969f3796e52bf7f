use std::fs;
use std::path::Path;

use faithfulness_rater::aggregate::aggregate;
use faithfulness_rater::error::EvalError;
use faithfulness_rater::record::{list_record_paths, load_record};
use faithfulness_rater::stats::{IouMasking, SampleStats};

fn write_record(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

fn evaluate_dir(json_dir: &Path, masking: IouMasking) -> Result<Vec<SampleStats>, EvalError> {
    let mut all = Vec::new();
    for path in list_record_paths(json_dir)? {
        let record = load_record(&path)?;
        let name = path.file_stem().unwrap().to_str().unwrap();
        let stats = SampleStats::from_record(name, &record, masking).map_err(|source| {
            EvalError::Metric {
                path: path.clone(),
                source,
            }
        })?;
        all.push(stats);
    }
    Ok(all)
}

const RECORD_FULL_HIT: &str = r#"{
    "region_area": [1.0],
    "insertion_score": [1.0],
    "deletion_score": [0.0],
    "insertion_iou": [1.0],
    "deletion_iou": [0.0],
    "insertion_cls": [1.0],
    "deletion_cls": [0.0]
}"#;

const RECORD_RAMP: &str = r#"{
    "region_area": [0.25, 0.5, 0.75, 1.0],
    "insertion_score": [0.2, 0.4, 0.6, 0.8],
    "deletion_score": [0.7, 0.5, 0.3, 0.1],
    "insertion_iou": [0.1, 0.3, 0.6, 0.8],
    "deletion_iou": [0.7, 0.5, 0.3, 0.1],
    "insertion_cls": [0.3, 0.5, 0.7, 0.9],
    "deletion_cls": [0.8, 0.6, 0.4, 0.2]
}"#;

#[test]
fn test_full_pipeline_over_directory() {
    let root = tempfile::tempdir().unwrap();
    let json_dir = root.path().join("json");
    fs::create_dir(&json_dir).unwrap();
    write_record(&json_dir, "sample_0001.json", RECORD_FULL_HIT);
    write_record(&json_dir, "sample_0002.json", RECORD_RAMP);

    let stats = evaluate_dir(&json_dir, IouMasking::PerThreshold).unwrap();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].sample, "sample_0001");

    let result = aggregate(&stats).unwrap();
    assert_eq!(result.samples, 2);

    // sample_0001 insertion AUC = 0.5, sample_0002 = 0.4125.
    let expected = (0.5 + 0.4125) / 2.0;
    assert!((result.insertion_auc.mean - expected).abs() < 1e-12);
}

#[test]
fn test_rerun_yields_identical_means() {
    let root = tempfile::tempdir().unwrap();
    let json_dir = root.path().join("json");
    fs::create_dir(&json_dir).unwrap();
    write_record(&json_dir, "a.json", RECORD_RAMP);
    write_record(&json_dir, "b.json", RECORD_FULL_HIT);

    let first = aggregate(&evaluate_dir(&json_dir, IouMasking::PerThreshold).unwrap()).unwrap();
    let second = aggregate(&evaluate_dir(&json_dir, IouMasking::PerThreshold).unwrap()).unwrap();

    assert_eq!(first.insertion_auc.mean, second.insertion_auc.mean);
    assert_eq!(first.deletion_iou_auc.mean, second.deletion_iou_auc.mean);
    assert_eq!(first.success_rate_iou50, second.success_rate_iou50);
}

#[test]
fn test_missing_key_aborts_the_run() {
    let root = tempfile::tempdir().unwrap();
    let json_dir = root.path().join("json");
    fs::create_dir(&json_dir).unwrap();
    write_record(&json_dir, "good.json", RECORD_FULL_HIT);
    write_record(
        &json_dir,
        "truncated.json",
        r#"{"region_area": [1.0], "insertion_score": [1.0]}"#,
    );

    let err = evaluate_dir(&json_dir, IouMasking::PerThreshold).unwrap_err();
    assert!(matches!(err, EvalError::Json { .. }));
}

#[test]
fn test_shape_violation_aborts_the_run() {
    let root = tempfile::tempdir().unwrap();
    let json_dir = root.path().join("json");
    fs::create_dir(&json_dir).unwrap();
    let short_iou = RECORD_RAMP.replace(
        r#""deletion_iou": [0.7, 0.5, 0.3, 0.1]"#,
        r#""deletion_iou": [0.7, 0.5]"#,
    );
    write_record(&json_dir, "bad_shape.json", &short_iou);

    let err = evaluate_dir(&json_dir, IouMasking::PerThreshold).unwrap_err();
    assert!(matches!(err, EvalError::Shape { .. }));
}

#[test]
fn test_empty_directory_aggregates_to_error() {
    let root = tempfile::tempdir().unwrap();
    let json_dir = root.path().join("json");
    fs::create_dir(&json_dir).unwrap();

    let stats = evaluate_dir(&json_dir, IouMasking::PerThreshold).unwrap();
    assert!(stats.is_empty());
    assert!(matches!(aggregate(&stats).unwrap_err(), EvalError::Empty));
}

#[test]
fn test_legacy_masking_matches_iou50_indicator() {
    let root = tempfile::tempdir().unwrap();
    let json_dir = root.path().join("json");
    fs::create_dir(&json_dir).unwrap();
    write_record(&json_dir, "a.json", RECORD_RAMP);

    let legacy = evaluate_dir(&json_dir, IouMasking::LegacyFixed).unwrap();
    assert_eq!(
        legacy[0].highest_confidence_iou50,
        legacy[0].highest_confidence_iou75
    );
}
