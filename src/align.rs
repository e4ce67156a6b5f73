//! # Chord alignment engine
//!
//! Maps each chord's detected column (from either notation) onto a definitive
//! character offset in the lyric text that falls on a word start.
//!
//! Word-processor documents and text conversion shift character positions, so
//! a chord column rarely lands exactly on the syllable it was typed above.
//! The contract here:
//!
//! 1. A column at or past the end of the lyric anchors at end-of-line
//!    (trailing chords are common and must not be dropped).
//! 2. A column already on a word start is kept.
//! 3. Otherwise search outward up to [`AlignPolicy::snap_window`] characters,
//!    nearest first, left candidate winning at equal distance.
//! 4. Past the window, anchor to the nearest word start anywhere in the line
//!    and log a warning; a chord is never dropped silently.
//! 5. An empty lyric line takes every chord at offset 0 (instrumental rows).
//!
//! Resulting placements are stably sorted by offset and directly-adjacent
//! duplicates (same chord, same offset) removed.

use tracing::warn;

use crate::chord::parse_chord;
use crate::classify::tokenize_columns;
use crate::song::{ChordPlacement, Line};

/// Tab stops every 4 columns approximate Word's proportional-font tabs
/// better than the terminal-standard 8.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Half a typical lyric word; past this the snap falls back to
/// nearest-word-anywhere with a warning.
pub const DEFAULT_SNAP_WINDOW: usize = 4;

/// Tunable alignment knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignPolicy {
    pub tab_width: usize,
    pub snap_window: usize,
}

impl Default for AlignPolicy {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            snap_window: DEFAULT_SNAP_WINDOW,
        }
    }
}

/// Expand tabs to spaces so chord columns line up with lyric characters.
pub fn expand_tabs(line: &str, tab_width: usize) -> String {
    let mut out = String::new();
    let mut col = 0usize;
    for ch in line.chars() {
        if ch == '\t' {
            let spaces = tab_width - (col % tab_width);
            for _ in 0..spaces {
                out.push(' ');
            }
            col += spaces;
        } else {
            out.push(ch);
            col += 1;
        }
    }
    out
}

/// Extract chord tokens and their character columns from a chords-only line.
pub fn chord_columns(chord_line: &str, tab_width: usize) -> Vec<(usize, String)> {
    let expanded = expand_tabs(chord_line, tab_width);
    tokenize_columns(&expanded)
        .into_iter()
        .filter_map(|t| parse_chord(&t.text).map(|c| (t.col, c.symbol)))
        .collect()
}

fn is_word_start(chars: &[char], pos: usize) -> bool {
    pos < chars.len()
        && !chars[pos].is_whitespace()
        && (pos == 0 || chars[pos - 1].is_whitespace())
}

/// Snap a raw column onto a word start in `chars`.
///
/// Returns the resolved offset and whether the bounded window was overrun
/// (the AlignmentOverflow case; the caller logs it).
pub fn snap_to_word_start(col: usize, chars: &[char], policy: &AlignPolicy) -> (usize, bool) {
    let len = chars.len();
    if len == 0 {
        return (0, false);
    }
    // Trailing chords anchor after the last word.
    if col >= len {
        return (len, false);
    }
    if is_word_start(chars, col) {
        return (col, false);
    }

    for d in 1..=policy.snap_window {
        if col >= d && is_word_start(chars, col - d) {
            return (col - d, false);
        }
        if col + d < len && is_word_start(chars, col + d) {
            return (col + d, false);
        }
    }

    // Nothing within the window: take the nearest word start in the whole
    // line, earlier word on ties. Never drop the chord.
    let mut best: Option<(usize, usize)> = None;
    for pos in 0..len {
        if is_word_start(chars, pos) {
            let dist = col.abs_diff(pos);
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((pos, dist));
            }
        }
    }
    match best {
        Some((pos, _)) => (pos, true),
        None => (0, true),
    }
}

/// Merge a chords-only line with the lyric line below it into a single
/// [`Line`]. Pass an empty lyric for chord-only rows with no lyric beneath.
pub fn merge_columns(chord_line: &str, lyric_line: &str, indent: u8, policy: &AlignPolicy) -> Line {
    let columns = chord_columns(chord_line, policy.tab_width);

    let expanded = expand_tabs(lyric_line, policy.tab_width);
    let trimmed_end = expanded.trim_end();
    let lead = trimmed_end.len() - trimmed_end.trim_start().len();
    let lead_chars = trimmed_end[..lead].chars().count();
    let text = trimmed_end.trim_start().to_string();
    let chars: Vec<char> = text.chars().collect();

    let mut placements: Vec<ChordPlacement> = Vec::new();
    for (col, symbol) in columns {
        if chars.is_empty() {
            placements.push(ChordPlacement { chord: symbol, pos: 0 });
            continue;
        }
        let shifted = col.saturating_sub(lead_chars);
        let (pos, overflowed) = snap_to_word_start(shifted, &chars, policy);
        if overflowed {
            warn!(
                chord = %symbol,
                column = shifted,
                resolved = pos,
                line = %text,
                "chord column outside snap window, anchored to nearest word"
            );
        }
        placements.push(ChordPlacement { chord: symbol, pos });
    }

    finish_placements(&mut placements);

    Line {
        indent,
        text,
        chords: placements,
    }
}

/// Stable-sort placements by offset and drop directly-adjacent duplicates.
pub fn finish_placements(placements: &mut Vec<ChordPlacement>) {
    placements.sort_by_key(|p| p.pos);
    placements.dedup_by(|a, b| a.pos == b.pos && a.chord == b.chord);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> AlignPolicy {
        AlignPolicy::default()
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_expand_tabs() {
        assert_eq!(expand_tabs("\tG", 4), "    G");
        assert_eq!(expand_tabs("ab\tc", 4), "ab  c");
        assert_eq!(expand_tabs("no tabs", 4), "no tabs");
    }

    #[test]
    fn test_snap_keeps_word_starts() {
        let text = chars("Amazing grace");
        assert_eq!(snap_to_word_start(0, &text, &policy()), (0, false));
        assert_eq!(snap_to_word_start(8, &text, &policy()), (8, false));
    }

    #[test]
    fn test_snap_mid_word_to_nearest() {
        // Column 9 is inside "grace"; its word start at 8 is one char left
        let text = chars("Amazing grace");
        assert_eq!(snap_to_word_start(9, &text, &policy()), (8, false));
    }

    #[test]
    fn test_snap_tie_prefers_left() {
        // Column 1 is the space between two one-char words; both starts are
        // one away, the earlier word wins
        let text = chars("a b");
        assert_eq!(snap_to_word_start(1, &text, &policy()), (0, false));
    }

    #[test]
    fn test_snap_past_end_anchors_at_eol() {
        let text = chars("Thee");
        assert_eq!(snap_to_word_start(13, &text, &policy()), (4, false));
    }

    #[test]
    fn test_snap_window_overflow_never_drops() {
        // One long word, column deep inside it and farther than the window
        // from the only word start
        let text = chars("extraordinary");
        let (pos, overflowed) = snap_to_word_start(9, &text, &policy());
        assert_eq!(pos, 0);
        assert!(overflowed);
    }

    #[test]
    fn test_merge_columns_snaps_into_word() {
        let line = merge_columns("G        C", "Amazing grace", 0, &policy());
        assert_eq!(line.text, "Amazing grace");
        assert_eq!(
            line.chords,
            vec![
                ChordPlacement { chord: "G".into(), pos: 0 },
                ChordPlacement { chord: "C".into(), pos: 8 },
            ]
        );
    }

    #[test]
    fn test_merge_columns_chord_only_row() {
        let line = merge_columns("C   G   F", "", 0, &policy());
        assert_eq!(line.text, "");
        let symbols: Vec<&str> = line.chords.iter().map(|p| p.chord.as_str()).collect();
        assert_eq!(symbols, vec!["C", "G", "F"]);
        assert!(line.chords.iter().all(|p| p.pos == 0));
    }

    #[test]
    fn test_merge_columns_indented_lyric() {
        // Lyric leads with a tab; chord columns shift with the stripped lead
        let line = merge_columns("\tG", "\tAmazing", 1, &policy());
        assert_eq!(line.text, "Amazing");
        assert_eq!(line.chords, vec![ChordPlacement { chord: "G".into(), pos: 0 }]);
        assert_eq!(line.indent, 1);
    }

    #[test]
    fn test_adjacent_duplicate_resolutions_collapse() {
        let mut placements = vec![
            ChordPlacement { chord: "G".into(), pos: 0 },
            ChordPlacement { chord: "G".into(), pos: 0 },
            ChordPlacement { chord: "C".into(), pos: 0 },
        ];
        finish_placements(&mut placements);
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].chord, "G");
        assert_eq!(placements[1].chord, "C");
    }

    #[test]
    fn test_barre_notation_in_chord_row() {
        let line = merge_columns("G bar    C", "Amazing grace", 0, &policy());
        let symbols: Vec<&str> = line.chords.iter().map(|p| p.chord.as_str()).collect();
        assert_eq!(symbols, vec!["G", "C"]);
    }
}
