//! Lyrics-directory scan.
//!
//! Lists candidate documents in deterministic (sorted) order. Word-processor
//! lock files (`~$...`) and known-unsupported formats are skipped with a
//! warning; anything outside the allow-list is ignored outright.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::ChartError;
use crate::report::SkipNote;

/// Word drops these next to any open document.
pub const LOCK_FILE_MARKER: &str = "~$";

/// What a directory scan turned up.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub files: Vec<PathBuf>,
    pub skipped: Vec<SkipNote>,
}

/// Scan `dir` for importable documents.
///
/// Only a failure to read the directory itself is an error; individual
/// entries that cannot be inspected are skipped with a warning.
pub fn scan_directory(
    dir: &Path,
    extensions: &[String],
    unsupported: &[String],
) -> Result<ScanOutcome, ChartError> {
    let entries = fs::read_dir(dir).map_err(|source| ChartError::Scan {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut outcome = ScanOutcome::default();
    let mut candidates: Vec<(String, PathBuf)> = Vec::new();

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "unreadable directory entry, skipping");
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        candidates.push((name, path));
    }
    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    for (name, path) in candidates {
        if name.starts_with(LOCK_FILE_MARKER) {
            warn!(file = %name, "skipping editor lock file");
            outcome.skipped.push(SkipNote::new(name, "editor lock file"));
            continue;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        if extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)) {
            outcome.files.push(path);
        } else if unsupported.iter().any(|e| e.eq_ignore_ascii_case(&ext)) {
            warn!(file = %name, format = %ext, "skipping unsupported document format");
            outcome
                .skipped
                .push(SkipNote::new(name, format!("unsupported format .{}", ext)));
        }
    }

    Ok(outcome)
}
