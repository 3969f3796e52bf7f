//! Loading and validation of per-sample result files.
//!
//! Each file under `<explanation-dir>/json/` is one JSON object holding the
//! insertion/deletion trajectories recorded for a single image.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::EvalError;

/// One per-sample result record.
///
/// All arrays are aligned index-wise with `region_area`, the monotonic
/// fractions of image area progressively inserted or deleted.
#[derive(Debug, Deserialize)]
pub struct SampleRecord {
    pub region_area: Vec<f64>,
    pub insertion_score: Vec<f64>,
    pub deletion_score: Vec<f64>,
    pub insertion_iou: Vec<f64>,
    pub deletion_iou: Vec<f64>,
    pub insertion_cls: Vec<f64>,
    pub deletion_cls: Vec<f64>,
}

impl SampleRecord {
    /// Checks that every array is non-empty and matches `region_area` in
    /// length. Returns the name of the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        let expected = self.region_area.len();
        if expected == 0 {
            return Err("region_area is empty".to_string());
        }
        let channels = [
            ("insertion_score", &self.insertion_score),
            ("deletion_score", &self.deletion_score),
            ("insertion_iou", &self.insertion_iou),
            ("deletion_iou", &self.deletion_iou),
            ("insertion_cls", &self.insertion_cls),
            ("deletion_cls", &self.deletion_cls),
        ];
        for (name, values) in channels {
            if values.len() != expected {
                return Err(format!(
                    "{} has {} entries, expected {}",
                    name,
                    values.len(),
                    expected
                ));
            }
        }
        Ok(())
    }
}

/// Reads, parses, and validates a single result file.
///
/// # Errors
///
/// Any I/O failure, JSON decode failure, missing key, or shape violation is
/// returned as a typed error carrying the path; callers abort the run.
pub fn load_record(path: &Path) -> Result<SampleRecord, EvalError> {
    let contents = fs::read_to_string(path).map_err(|source| EvalError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let record: SampleRecord =
        serde_json::from_str(&contents).map_err(|source| EvalError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    record.validate().map_err(|reason| EvalError::Shape {
        path: path.to_path_buf(),
        reason,
    })?;
    Ok(record)
}

/// Lists the `.json` entries of a directory, sorted by file name so the
/// processing order is deterministic.
pub fn list_record_paths(json_dir: &Path) -> Result<Vec<PathBuf>, EvalError> {
    let entries = fs::read_dir(json_dir).map_err(|source| EvalError::Io {
        path: json_dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| EvalError::Io {
            path: json_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    Ok(paths)
}
