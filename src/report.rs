//! Run summary
//!
//! Accumulates what happened across a whole import run: counts of songs
//! added, kept, and reimported, files skipped with reasons, and degenerate
//! parses worth a second look. Printed at the end of every run.

use std::fmt;

/// A file that was passed over, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct SkipNote {
    pub file: String,
    pub reason: String,
}

impl SkipNote {
    pub fn new(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            reason: reason.into(),
        }
    }
}

/// Everything a run wants to tell the user once it finishes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Candidate files found in the lyrics directory.
    pub files_found: usize,
    /// Songs in the written output file.
    pub total_songs: usize,
    /// Songs carried over untouched from the existing data file.
    pub kept: usize,
    /// Newly discovered songs, with their detected keys.
    pub added: Vec<(String, String)>,
    /// Songs re-parsed over an existing entry via a force flag.
    pub reimported: Vec<String>,
    /// Freshly parsed songs whose title already existed (manual edits kept).
    pub already_present: usize,
    /// Files skipped, with reasons.
    pub skipped: Vec<SkipNote>,
    /// Songs that parsed to no content; usually a parsing failure.
    pub degenerate: Vec<String>,
    /// A force-song request that could not be honored.
    pub force_song_error: Option<String>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} chord songs total", self.total_songs)?;
        if self.kept > 0 {
            writeln!(f, "  {} songs preserved from existing file", self.kept)?;
        }
        if !self.added.is_empty() {
            writeln!(f, "  {} new songs added:", self.added.len())?;
            for (title, key) in &self.added {
                writeln!(f, "    + {} (key {})", title, key)?;
            }
        }
        if !self.reimported.is_empty() {
            writeln!(f, "  {} songs reimported:", self.reimported.len())?;
            for title in &self.reimported {
                writeln!(f, "    * {}", title)?;
            }
        }
        if self.already_present > 0 {
            writeln!(
                f,
                "  {} songs already existed (kept manual edits)",
                self.already_present
            )?;
        }
        if !self.degenerate.is_empty() {
            writeln!(
                f,
                "  {} songs parsed without content (check the source documents):",
                self.degenerate.len()
            )?;
            for title in &self.degenerate {
                writeln!(f, "    ? {}", title)?;
            }
        }
        if !self.skipped.is_empty() {
            writeln!(f, "  {} files skipped:", self.skipped.len())?;
            for note in &self.skipped {
                writeln!(f, "    - {} ({})", note.file, note.reason)?;
            }
        }
        if let Some(err) = &self.force_song_error {
            writeln!(f, "  error: {}", err)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_outcomes() {
        let summary = RunSummary {
            files_found: 3,
            total_songs: 2,
            kept: 1,
            added: vec![("Amazing Grace".into(), "G".into())],
            skipped: vec![SkipNote::new("broken.docx", "conversion error")],
            ..Default::default()
        };
        let text = summary.to_string();
        assert!(text.contains("2 chord songs total"));
        assert!(text.contains("+ Amazing Grace (key G)"));
        assert!(text.contains("broken.docx (conversion error)"));
    }
}
