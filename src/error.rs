//! # Error Types
//!
//! Run-level errors for the import tool.
//!
//! Per-file problems (a document that fails text conversion, a file that is
//! not a chord chart) are not errors here: they are recovered locally,
//! logged, and accumulated into the run summary. `ChartError` covers what
//! actually stops or degrades a run:
//!
//! - `Scan` / `Write` / `Serialize` / `Config`: fatal, nothing is written.
//! - `ForceSongNotFound` / `ForceSongAmbiguous`: the requested reimport did
//!   not happen; the run still completes in preserve mode and exits
//!   non-zero.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    /// The input directory itself could not be read.
    #[error("failed to read lyrics directory {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The generated data file could not be written or swapped into place.
    #[error("failed to write song data file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Song records could not be serialized to JSON.
    #[error("failed to serialize song data: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The optional YAML config file was present but unusable.
    #[error("failed to load config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// `--force-song` matched no newly parsed song.
    #[error("--force-song \"{title}\" matched no song parsed from the source documents")]
    ForceSongNotFound { title: String },

    /// `--force-song` matched more than one newly parsed song.
    #[error("--force-song \"{title}\" is ambiguous; it matches: {}", candidates.join(", "))]
    ForceSongAmbiguous {
        title: String,
        candidates: Vec<String>,
    },
}

impl ChartError {
    /// Force-song failures degrade the run (non-zero exit) without
    /// discarding its output.
    pub fn is_force_song_failure(&self) -> bool {
        matches!(
            self,
            ChartError::ForceSongNotFound { .. } | ChartError::ForceSongAmbiguous { .. }
        )
    }
}
