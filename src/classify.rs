//! # Chord-file classification
//!
//! Decides, from a document's plain-text lines, whether it is a chord chart
//! (an import target) or lyrics-only (excluded). Lyrics-only is exactly the
//! complement: a file is lyrics-only iff it is not a chord file.
//!
//! ## Rules
//! - A line is a *chord line* when enough of its whitespace-delimited tokens
//!   parse as chords (`ClassifyPolicy::chord_line_ratio`, default 0.6 to
//!   tolerate conversion artifacts on real chord rows).
//! - A line *has inline chords* when it contains bracket chords like
//!   `[G]race`, with lyric text remaining or at least two brackets (so a
//!   bare section label `[Chorus]` does not count).
//! - A file is a *chord file* when more than
//!   `ClassifyPolicy::chord_file_ratio` (default 0.15) of its non-empty
//!   lines are chord lines or carry inline chords. Zero non-empty lines is
//!   never a chord file.

use crate::chord::is_chord_token;

/// Default minimum fraction of tokens on a line that must be chords.
pub const DEFAULT_CHORD_LINE_RATIO: f64 = 0.6;

/// Default fraction of non-empty lines that must be chord-bearing for the
/// whole file to classify as a chord chart.
pub const DEFAULT_CHORD_FILE_RATIO: f64 = 0.15;

/// Tunable classification thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifyPolicy {
    pub chord_line_ratio: f64,
    pub chord_file_ratio: f64,
}

impl Default for ClassifyPolicy {
    fn default() -> Self {
        Self {
            chord_line_ratio: DEFAULT_CHORD_LINE_RATIO,
            chord_file_ratio: DEFAULT_CHORD_FILE_RATIO,
        }
    }
}

/// A whitespace-delimited token with its starting character column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnToken {
    pub col: usize,
    pub text: String,
}

/// Split a line into tokens with their character columns.
///
/// A standalone `bar` token directly after a chord is dropped so the two-word
/// barre notation (`G bar`) reads as the single chord `G`.
pub fn tokenize_columns(line: &str) -> Vec<ColumnToken> {
    let mut tokens: Vec<ColumnToken> = Vec::new();
    let mut current = String::new();
    let mut start = 0usize;

    for (col, ch) in line.chars().enumerate() {
        if ch.is_whitespace() {
            if !current.is_empty() {
                push_token(&mut tokens, start, std::mem::take(&mut current));
            }
        } else {
            if current.is_empty() {
                start = col;
            }
            current.push(ch);
        }
    }
    if !current.is_empty() {
        push_token(&mut tokens, start, current);
    }
    tokens
}

fn push_token(tokens: &mut Vec<ColumnToken>, col: usize, text: String) {
    if text == "bar" {
        if let Some(prev) = tokens.last() {
            if is_chord_token(&prev.text) {
                return;
            }
        }
    }
    tokens.push(ColumnToken { col, text });
}

/// Is this line composed (mostly) of chord tokens?
pub fn is_chord_line(line: &str, policy: &ClassifyPolicy) -> bool {
    let tokens = tokenize_columns(line);
    if tokens.is_empty() {
        return false;
    }
    let chords = tokens.iter().filter(|t| is_chord_token(&t.text)).count();
    chords > 0 && chords as f64 >= tokens.len() as f64 * policy.chord_line_ratio
}

/// Count bracket chord annotations and remaining lyric characters on a line.
fn bracket_stats(line: &str) -> (usize, usize) {
    let chars: Vec<char> = line.chars().collect();
    let mut brackets = 0usize;
    let mut lyric_chars = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        if chars[i] == '[' {
            if let Some(close) = chars[i + 1..].iter().position(|&c| c == ']') {
                let inner: String = chars[i + 1..i + 1 + close].iter().collect();
                if is_chord_token(inner.trim()) {
                    brackets += 1;
                    i += close + 2;
                    continue;
                }
            }
        }
        if !chars[i].is_whitespace() {
            lyric_chars += 1;
        }
        i += 1;
    }
    (brackets, lyric_chars)
}

/// Does this line carry inline bracket chords (`[G]race how [C]sweet`)?
///
/// Chord-only bracket rows (`[C] [G] [F]`) count too, but a single bracket
/// with nothing else on the line does not; that shape is a section label or
/// a stray annotation, not playable notation.
pub fn has_inline_chords(line: &str) -> bool {
    let (brackets, lyric_chars) = bracket_stats(line);
    brackets >= 1 && (lyric_chars > 0 || brackets >= 2)
}

/// Classify a whole document from its plain-text lines.
pub fn is_chord_file<S: AsRef<str>>(lines: &[S], policy: &ClassifyPolicy) -> bool {
    let non_empty: Vec<&str> = lines
        .iter()
        .map(|l| l.as_ref())
        .filter(|l| !l.trim().is_empty())
        .collect();
    if non_empty.is_empty() {
        return false;
    }
    let chord_lines = non_empty
        .iter()
        .filter(|l| is_chord_line(l, policy) || has_inline_chords(l))
        .count();
    chord_lines as f64 / non_empty.len() as f64 > policy.chord_file_ratio
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ClassifyPolicy {
        ClassifyPolicy::default()
    }

    #[test]
    fn test_chord_line_detection() {
        assert!(is_chord_line("G        C", &policy()));
        assert!(is_chord_line("  Am7  G/B   Dsus4", &policy()));
        assert!(!is_chord_line("Amazing grace how sweet the sound", &policy()));
        assert!(!is_chord_line("", &policy()));
        // One stray artifact among chords still reads as a chord line
        assert!(is_chord_line("G C D x2", &policy()));
    }

    #[test]
    fn test_barre_notation_collapses() {
        assert!(is_chord_line("G bar   C", &policy()));
        assert!(is_chord_line("F#bar", &policy()));
        // "bar" with no chord before it is a lyric word
        assert!(!is_chord_line("bar none", &policy()));
    }

    #[test]
    fn test_inline_chord_detection() {
        assert!(has_inline_chords("[G]Amazing [C]grace"));
        assert!(has_inline_chords("[C] [G] [F]"));
        assert!(has_inline_chords("Amazing [C]grace"));
        // A lone section label is not inline notation
        assert!(!has_inline_chords("[Chorus]"));
        assert!(!has_inline_chords("[Verse 1]"));
        assert!(!has_inline_chords("no brackets here"));
    }

    #[test]
    fn test_file_classification_threshold() {
        // 1 chord line out of 4 non-empty = 0.25 > 0.15
        let chart = ["Amazing Grace", "", "G        C", "Amazing grace", "how sweet"];
        assert!(is_chord_file(&chart, &policy()));

        // 1 out of 8 = 0.125 <= 0.15
        let lyrics = [
            "Amazing Grace",
            "Amazing grace how sweet the sound",
            "That saved a wretch like me",
            "I once was lost but now am found",
            "Was blind but now I see",
            "Through many dangers toils and snares",
            "I have already come",
            "G",
        ];
        assert!(!is_chord_file(&lyrics, &policy()));
    }

    #[test]
    fn test_empty_file_is_not_chart() {
        let empty: [&str; 0] = [];
        assert!(!is_chord_file(&empty, &policy()));
        assert!(!is_chord_file(&["", "   ", "\t"], &policy()));
    }

    #[test]
    fn test_token_columns() {
        let tokens = tokenize_columns("G        C");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].col, 0);
        assert_eq!(tokens[1].col, 9);
    }
}
