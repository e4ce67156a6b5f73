//! # Song data model
//!
//! Types for the structured song records consumed by the browser viewer.
//!
//! ## Type Hierarchy
//! ```text
//! Song
//!   ├── title: String
//!   └── Vec<Section>
//!         ├── label: Option<String>   ([Verse 1], Chorus, ... or None)
//!         └── Vec<Line>
//!               ├── indent: 0|1|2
//!               ├── text: String      (lyric text, chords removed)
//!               └── Vec<ChordPlacement>
//!                     ├── chord: String  (validated chord symbol)
//!                     └── pos: usize     (character offset into text)
//! ```
//!
//! Serde field names and ordering match the generated data file schema
//! exactly; the viewer loads that file as its whole in-memory database.
//!
//! Values are assembled once per parse run and never mutated afterwards; the
//! merge engine only compares and discards whole `Song` values.

use serde::{Deserialize, Serialize};

use crate::chord::{detect_key, parse_chord};

/// A chord anchored at a character offset in a lyric line.
///
/// `pos` always lands on a word start, or equals the character count of the
/// line as an end-of-line anchor for trailing chords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordPlacement {
    pub chord: String,
    pub pos: usize,
}

/// A lyric line with zero or more chord placements.
///
/// Blank separator lines are kept as empty-text, zero-indent lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub indent: u8,
    pub text: String,
    #[serde(default)]
    pub chords: Vec<ChordPlacement>,
}

impl Line {
    /// A blank separator line.
    pub fn blank() -> Self {
        Self {
            indent: 0,
            text: String::new(),
            chords: Vec::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty() && self.chords.is_empty()
    }

    /// Re-render the line in inline bracket notation, e.g.
    /// `[G]Amazing [C]grace`. Bracket notation is lossless for chords placed
    /// on word boundaries, so parsing the result reproduces the placements.
    pub fn render_inline(&self) -> String {
        let chars: Vec<char> = self.text.chars().collect();
        let mut out = String::new();
        let mut next = 0usize;

        for (i, ch) in chars.iter().enumerate() {
            while next < self.chords.len() && self.chords[next].pos == i {
                out.push('[');
                out.push_str(&self.chords[next].chord);
                out.push(']');
                next += 1;
            }
            out.push(*ch);
        }
        // Trailing chords anchored at or past end-of-line
        for placement in &self.chords[next..] {
            out.push('[');
            out.push_str(&placement.chord);
            out.push(']');
        }
        out
    }
}

/// A labeled (or unlabeled) group of lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub label: Option<String>,
    pub lines: Vec<Line>,
}

impl Section {
    pub fn unlabeled() -> Self {
        Self {
            label: None,
            lines: Vec::new(),
        }
    }

    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            lines: Vec::new(),
        }
    }
}

/// One imported song: a title plus ordered sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    pub sections: Vec<Section>,
}

impl Song {
    /// Detect the key from the most common chord root, `"C"` when unchorded.
    pub fn key(&self) -> String {
        let roots: Vec<String> = self
            .sections
            .iter()
            .flat_map(|s| s.lines.iter())
            .flat_map(|l| l.chords.iter())
            .filter_map(|p| parse_chord(&p.chord))
            .map(|c| c.root)
            .collect();
        detect_key(roots.iter().map(|r| r.as_str()))
    }

    /// True when no line carries text or chords; such songs survive the
    /// import (one empty section) but are flagged in the run summary since
    /// they usually indicate a parsing failure.
    pub fn is_degenerate(&self) -> bool {
        self.sections
            .iter()
            .flat_map(|s| s.lines.iter())
            .all(|l| l.is_blank())
    }
}

/// Normalize a title for merge-phase comparison: lowercase, ASCII letters and
/// digits only. `"As The Deer"` and `"as the deer!"` collapse to the same key.
pub fn normalize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("As The Deer"), "asthedeer");
        assert_eq!(normalize_title("as the deer!"), "asthedeer");
        assert_eq!(normalize_title("The Vow – Cody Carnes"), "thevowcodycarnes");
        assert_eq!(normalize_title("10,000 Reasons"), "10000reasons");
    }

    #[test]
    fn test_render_inline() {
        let line = Line {
            indent: 0,
            text: "Amazing grace how sweet the sound".to_string(),
            chords: vec![
                ChordPlacement { chord: "G".into(), pos: 0 },
                ChordPlacement { chord: "C".into(), pos: 8 },
                ChordPlacement { chord: "G".into(), pos: 18 },
            ],
        };
        assert_eq!(
            line.render_inline(),
            "[G]Amazing [C]grace how [G]sweet the sound"
        );
    }

    #[test]
    fn test_render_inline_trailing_chord() {
        let line = Line {
            indent: 0,
            text: "Thee".to_string(),
            chords: vec![
                ChordPlacement { chord: "G".into(), pos: 0 },
                ChordPlacement { chord: "C".into(), pos: 4 },
            ],
        };
        assert_eq!(line.render_inline(), "[G]Thee[C]");
    }

    #[test]
    fn test_song_key_from_roots() {
        let song = Song {
            title: "Test".into(),
            sections: vec![Section {
                label: None,
                lines: vec![Line {
                    indent: 0,
                    text: "la la".into(),
                    chords: vec![
                        ChordPlacement { chord: "G".into(), pos: 0 },
                        ChordPlacement { chord: "G/B".into(), pos: 3 },
                        ChordPlacement { chord: "C".into(), pos: 3 },
                    ],
                }],
            }],
        };
        assert_eq!(song.key(), "G");
    }

    #[test]
    fn test_degenerate_song() {
        let song = Song {
            title: "Empty".into(),
            sections: vec![Section::unlabeled()],
        };
        assert!(song.is_degenerate());
    }

    #[test]
    fn test_schema_field_names() {
        let line = Line {
            indent: 1,
            text: "hi".into(),
            chords: vec![ChordPlacement { chord: "C".into(), pos: 0 }],
        };
        let json = serde_json::to_string(&line).unwrap();
        assert_eq!(
            json,
            r#"{"indent":1,"text":"hi","chords":[{"chord":"C","pos":0}]}"#
        );
    }
}
