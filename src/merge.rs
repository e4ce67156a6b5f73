//! # Database merge engine
//!
//! Reconciles freshly parsed songs against the previously generated data
//! file, which may carry manual edits made in the viewer. Three policies:
//!
//! - **Preserve** (default): existing songs are kept untouched; only fresh
//!   songs with a previously unseen title are added.
//! - **ForceAll**: the existing database is discarded; the output is exactly
//!   the fresh parse. Songs that existed only through manual edits are gone.
//! - **ForceSong(title)**: exactly one fresh song (matched case- and
//!   punctuation-insensitively, substrings tolerated) replaces its existing
//!   entry; everything else behaves as Preserve. Zero or multiple matches is
//!   an error, and the merge falls back to Preserve so the run's work is not
//!   wasted.
//!
//! The output is always sorted alphabetically by title, case-insensitive,
//! with each normalized title appearing exactly once.

use tracing::warn;

use crate::error::ChartError;
use crate::song::{normalize_title, Song};

/// Which reimport behavior this run was asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum MergePolicy {
    Preserve,
    ForceAll,
    ForceSong(String),
}

/// The reconciled database plus what happened to get there.
#[derive(Debug)]
pub struct MergeOutcome {
    pub songs: Vec<Song>,
    pub kept: usize,
    pub added: Vec<String>,
    pub reimported: Vec<String>,
    pub already_present: usize,
    pub force_error: Option<ChartError>,
}

/// Normalized-title comparison, substring-tolerant in both directions so
/// "The Vow" matches "The Vow – Cody Carnes".
fn titles_match(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// Drop fresh parses whose normalized title repeats an earlier one.
fn dedupe_fresh(fresh: Vec<Song>) -> Vec<Song> {
    let mut seen: Vec<String> = Vec::new();
    let mut out: Vec<Song> = Vec::new();
    for song in fresh {
        let norm = normalize_title(&song.title);
        if seen.contains(&norm) {
            warn!(title = %song.title, "duplicate title among source documents, keeping first parse");
        } else {
            seen.push(norm);
            out.push(song);
        }
    }
    out
}

/// Merge fresh parses into the existing database under `policy`.
pub fn merge(existing: Vec<Song>, fresh: Vec<Song>, policy: &MergePolicy) -> MergeOutcome {
    let fresh = dedupe_fresh(fresh);

    let mut outcome = match policy {
        MergePolicy::ForceAll => {
            let reimported = fresh.iter().map(|s| s.title.clone()).collect();
            MergeOutcome {
                songs: fresh,
                kept: 0,
                added: Vec::new(),
                reimported,
                already_present: 0,
                force_error: None,
            }
        }
        MergePolicy::Preserve => preserve_merge(existing, fresh),
        MergePolicy::ForceSong(title) => force_song_merge(existing, fresh, title),
    };

    outcome
        .songs
        .sort_by_key(|s| s.title.to_lowercase());
    outcome
}

fn preserve_merge(existing: Vec<Song>, fresh: Vec<Song>) -> MergeOutcome {
    let existing_norms: Vec<String> =
        existing.iter().map(|s| normalize_title(&s.title)).collect();
    let kept = existing.len();

    let mut songs = existing;
    let mut added = Vec::new();
    let mut already_present = 0usize;

    for song in fresh {
        let norm = normalize_title(&song.title);
        if existing_norms.iter().any(|e| titles_match(e, &norm)) {
            already_present += 1;
        } else {
            added.push(song.title.clone());
            songs.push(song);
        }
    }

    MergeOutcome {
        songs,
        kept,
        added,
        reimported: Vec::new(),
        already_present,
        force_error: None,
    }
}

fn force_song_merge(existing: Vec<Song>, fresh: Vec<Song>, title: &str) -> MergeOutcome {
    let wanted = normalize_title(title);
    let candidates: Vec<usize> = fresh
        .iter()
        .enumerate()
        .filter(|(_, s)| titles_match(&normalize_title(&s.title), &wanted))
        .map(|(i, _)| i)
        .collect();

    match candidates.len() {
        1 => {
            let mut fresh = fresh;
            let forced = fresh.remove(candidates[0]);
            let forced_norm = normalize_title(&forced.title);
            let reimported = vec![forced.title.clone()];

            // Replace the matching existing entry, or add when absent
            let mut existing = existing;
            let slot = existing
                .iter()
                .position(|s| titles_match(&normalize_title(&s.title), &forced_norm));
            let kept_delta = match slot {
                Some(i) => {
                    existing[i] = forced;
                    1
                }
                None => {
                    existing.push(forced);
                    0
                }
            };

            // Everything else follows preserve behavior
            let mut outcome = preserve_merge(existing, fresh);
            outcome.kept = outcome.kept.saturating_sub(kept_delta);
            outcome.reimported = reimported;
            outcome
        }
        0 => {
            let mut outcome = preserve_merge(existing, fresh);
            outcome.force_error = Some(ChartError::ForceSongNotFound {
                title: title.to_string(),
            });
            outcome
        }
        _ => {
            let titles = candidates
                .iter()
                .map(|&i| fresh[i].title.clone())
                .collect();
            let mut outcome = preserve_merge(existing, fresh);
            outcome.force_error = Some(ChartError::ForceSongAmbiguous {
                title: title.to_string(),
                candidates: titles,
            });
            outcome
        }
    }
}
