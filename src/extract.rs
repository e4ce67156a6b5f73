//! Document text extraction
//!
//! The import pipeline treats text extraction as a pure `file -> lines`
//! capability that can fail per-file. The default implementation shells out
//! to the platform's `textutil` converter; another platform substitutes any
//! document-to-text path behind the same trait. Failures are recovered by
//! the caller (the file is skipped and reported), never fatal to the run.

use std::fs;
use std::io;
use std::path::Path;
use std::process::Command;

use thiserror::Error;

/// Per-file extraction failure. Recovered by the pipeline into a skip note.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("converter exited with {status}: {stderr}")]
    Tool { status: String, stderr: String },
}

/// The extraction capability: one word-processor file in, plain text out.
pub trait TextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Replace Unicode line/paragraph separators and CR variants with `\n` so
/// the rest of the pipeline only ever sees newline-delimited text.
pub fn normalize_line_breaks(text: &str) -> String {
    text.replace('\u{2028}', "\n")
        .replace('\u{2029}', "\n")
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

/// Extractor backed by the `textutil` command-line converter.
///
/// `.txt` files are read directly; everything else goes through
/// `textutil -convert txt -stdout <file>`.
#[derive(Debug, Default)]
pub struct TextutilExtractor;

impl TextExtractor for TextutilExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        if ext.as_deref() == Some("txt") {
            return PlainTextExtractor.extract(path);
        }

        let output = Command::new("textutil")
            .args(["-convert", "txt", "-stdout"])
            .arg(path)
            .output()?;

        if !output.status.success() {
            return Err(ExtractError::Tool {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Extractor that reads files as-is. Used for pre-extracted text and in
/// tests, where no converter is available.
#[derive(Debug, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_line_breaks() {
        assert_eq!(normalize_line_breaks("a\u{2028}b\u{2029}c"), "a\nb\nc");
        assert_eq!(normalize_line_breaks("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn test_plain_text_extractor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.txt");
        fs::write(&path, "Amazing Grace\n\nG\nAmazing grace\n").unwrap();

        let text = PlainTextExtractor.extract(&path).unwrap();
        assert!(text.starts_with("Amazing Grace"));

        let missing = PlainTextExtractor.extract(&dir.path().join("nope.txt"));
        assert!(missing.is_err());
    }
}
