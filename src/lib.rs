//! # chordbook
//!
//! Imports word-processor chord charts into the structured song data file
//! used by the chord viewer.
//!
//! ## Pipeline
//! 1. Scan the lyrics directory for candidate documents ([`scan`])
//! 2. Extract plain text per file ([`extract`])
//! 3. Classify chord charts vs lyrics-only files ([`classify`])
//! 4. Parse notation and snap chords onto word starts ([`parser`], [`align`])
//! 5. Assemble Song records ([`assemble`])
//! 6. Merge with the existing database under the requested policy ([`merge`])
//! 7. Write the data file atomically ([`datafile`])
//!
//! Each file parses independently; a failing file is skipped and reported,
//! never fatal. The merge is the only step that needs the full set.

pub mod align;
pub mod assemble;
pub mod chord;
pub mod classify;
pub mod config;
pub mod datafile;
pub mod error;
pub mod extract;
pub mod merge;
pub mod parser;
pub mod report;
pub mod scan;
pub mod song;

use std::path::PathBuf;

use tracing::{info, warn};

pub use config::ImportConfig;
pub use error::ChartError;
pub use extract::{PlainTextExtractor, TextExtractor, TextutilExtractor};
pub use merge::MergePolicy;
pub use report::RunSummary;
pub use song::{ChordPlacement, Line, Section, Song};

use assemble::assemble_song;
use classify::is_chord_file;
use extract::normalize_line_breaks;
use merge::merge;
use report::SkipNote;
use scan::scan_directory;

/// Everything one run needs to know.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub lyrics_dir: PathBuf,
    pub output: PathBuf,
    pub policy: MergePolicy,
    pub config: ImportConfig,
}

/// Parse one document's text into a Song.
///
/// Returns `None` for lyrics-only files (the classifier's complementary
/// category). A classified chord file always yields a Song, even a
/// degenerate one.
pub fn import_song(text: &str, filename: &str, config: &ImportConfig) -> Option<Song> {
    let normalized = normalize_line_breaks(text);
    let lines: Vec<&str> = normalized.split('\n').collect();
    let classify = config.classify_policy();
    if !is_chord_file(&lines, &classify) {
        return None;
    }
    Some(assemble_song(
        &lines,
        filename,
        &classify,
        &config.align_policy(),
    ))
}

/// Run the whole import: scan, extract, parse, merge, write.
///
/// Fatal errors (unreadable directory, failed write) come back as `Err`; a
/// force-song miss is reported inside the summary instead so the rest of the
/// run's work still lands in the output file.
pub fn run_import(
    options: &ImportOptions,
    extractor: &dyn TextExtractor,
) -> Result<RunSummary, ChartError> {
    let scanned = scan_directory(
        &options.lyrics_dir,
        &options.config.extensions,
        &options.config.unsupported_extensions,
    )?;
    info!(files = scanned.files.len(), "found candidate song files");

    let existing = match options.policy {
        MergePolicy::ForceAll => Vec::new(),
        _ => datafile::load_existing(&options.output),
    };
    if !existing.is_empty() {
        info!(count = existing.len(), "loaded existing songs from data file");
    }

    let files_found = scanned.files.len();
    let mut skipped = scanned.skipped;
    let mut fresh: Vec<Song> = Vec::new();
    let mut degenerate: Vec<String> = Vec::new();

    for path in &scanned.files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let text = match extractor.extract(path) {
            Ok(text) => text,
            Err(e) => {
                warn!(file = %name, error = %e, "text extraction failed, skipping file");
                skipped.push(SkipNote::new(&name, format!("conversion error: {}", e)));
                continue;
            }
        };

        match import_song(&text, &name, &options.config) {
            Some(song) => {
                if song.is_degenerate() {
                    warn!(file = %name, title = %song.title, "song parsed without content");
                    degenerate.push(song.title.clone());
                }
                fresh.push(song);
            }
            None => skipped.push(SkipNote::new(&name, "not a chord file")),
        }
    }

    let outcome = merge(existing, fresh, &options.policy);
    datafile::write_atomic(&options.output, &outcome.songs)?;
    info!(path = %options.output.display(), songs = outcome.songs.len(), "wrote song data file");

    let added = outcome
        .added
        .iter()
        .map(|title| {
            let key = outcome
                .songs
                .iter()
                .find(|s| &s.title == title)
                .map(|s| s.key())
                .unwrap_or_else(|| "C".to_string());
            (title.clone(), key)
        })
        .collect();

    Ok(RunSummary {
        files_found,
        total_songs: outcome.songs.len(),
        kept: outcome.kept,
        added,
        reimported: outcome.reimported,
        already_present: outcome.already_present,
        skipped,
        degenerate,
        force_song_error: outcome.force_error.map(|e| e.to_string()),
    })
}
