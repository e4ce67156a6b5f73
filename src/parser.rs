//! # Line-level parsing
//!
//! Recognizes the building blocks the song assembler folds together:
//!
//! - Section labels: `[Verse 1]`, loose `[chorus x2]`, and unbracketed
//!   headings from a fixed vocabulary (`Chorus`, `Bridge`, `Intro`, ...,
//!   optionally prefixed `Repeat`/`Final`, numbered, or suffixed `x2`).
//!   A bracket whose content is a valid chord (`[Am7]`) is never a label.
//! - Date-like lines (`Sunday June 1`, `May 2025`, `6/1/2025`) skipped
//!   during title scanning, and subtitle lines (`capo 3`, `by J. Hobbs`)
//!   skipped between title and body.
//! - Inline bracket notation: `[G]Amazing [C]grace` becomes lyric text with
//!   chord placements at the position of the character following each
//!   bracket, offsets computed against the post-removal text.
//! - Indent buckets: leading tabs count one level each, otherwise 8+ spaces
//!   is level 2 and 4+ spaces level 1, clamped to 2.

use crate::align::{finish_placements, snap_to_word_start, AlignPolicy};
use crate::chord::{is_chord_token, parse_chord};
use crate::song::{ChordPlacement, Line};

const WEEKDAYS: [&str; 7] = [
    "sunday", "monday", "tuesday", "wednesday", "thursday", "friday", "saturday",
];

const MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august",
    "september", "october", "november", "december",
];

const HEADINGS: [&str; 12] = [
    "intro", "verse", "chorus", "bridge", "tag", "outro", "interlude", "turn",
    "instrumental", "ending", "vamp", "pre-chorus",
];

/// Longest trailer allowed after a loose bracketed label like `[chorus x2]`.
const LOOSE_LABEL_TRAILER_MAX: usize = 10;

/// Bucket a raw line's leading whitespace into indent level 0, 1, or 2.
pub fn indent_level(raw: &str) -> u8 {
    let mut tabs = 0usize;
    let mut spaces = 0usize;
    for ch in raw.chars() {
        match ch {
            '\t' if spaces == 0 => tabs += 1,
            ' ' if tabs == 0 => spaces += 1,
            _ => break,
        }
    }
    if tabs > 0 {
        tabs.min(2) as u8
    } else if spaces >= 8 {
        2
    } else if spaces >= 4 {
        1
    } else {
        0
    }
}

/// If the line is a section label, return the label text.
pub fn parse_section_label(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(after_open) = trimmed.strip_prefix('[') {
        let close = after_open.find(']')?;
        let content = after_open[..close].trim();
        // [Am7] is inline chord notation, not a section label
        if content.is_empty() || is_chord_token(content) {
            return None;
        }
        let rest = after_open[close + 1..].trim();
        if rest.len() > LOOSE_LABEL_TRAILER_MAX {
            return None;
        }
        return Some(content.to_string());
    }

    parse_unbracketed_heading(trimmed)
}

/// Match unbracketed headings like `Chorus`, `Verse 2`, `Repeat Chorus`,
/// `Bridge x2`, `Final Chorus Repeat`, `Pre Chorus`.
fn parse_unbracketed_heading(trimmed: &str) -> Option<String> {
    let tokens: Vec<String> = trimmed
        .split_whitespace()
        .map(|t| t.to_ascii_lowercase())
        .collect();
    if tokens.is_empty() {
        return None;
    }

    let mut i = 0;
    if tokens[i] == "repeat" || tokens[i] == "final" {
        i += 1;
    }
    if i >= tokens.len() {
        return None;
    }

    if tokens[i] == "pre" && tokens.get(i + 1).map(String::as_str) == Some("chorus") {
        i += 2;
    } else if HEADINGS.contains(&tokens[i].as_str()) || tokens[i] == "prechorus" {
        i += 1;
    } else {
        return None;
    }

    if i < tokens.len() && tokens[i].chars().all(|c| c.is_ascii_digit()) {
        i += 1;
    }
    if i < tokens.len() {
        let t = tokens[i].as_str();
        let is_times = t.strip_prefix('x')
            .map_or(false, |n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()));
        if t == "repeat" || is_times {
            i += 1;
        }
    }

    if i == tokens.len() {
        Some(trimmed.to_string())
    } else {
        None
    }
}

/// Does this line parse as a calendar date?
///
/// Covers weekday-led headers (`Sunday June 1`), month-name dates
/// (`May 2025`, `May-June 2025`, `June 1, 2025`), and numeric dates
/// (`6/1/2025`, `2025-06-01`).
pub fn is_date_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    let tokens: Vec<String> = trimmed
        .split_whitespace()
        .map(|t| t.trim_matches(',').to_ascii_lowercase())
        .collect();

    let first = tokens[0].as_str();
    if WEEKDAYS.contains(&first) {
        return true;
    }

    // "May 2025", "May-June 2025", "June 1, 2025"
    let month_lead = first.split('-').next().map_or(false, |m| MONTHS.contains(&m));
    if month_lead && tokens.len() >= 2 {
        let rest_numeric = tokens[1..]
            .iter()
            .all(|t| !t.is_empty() && t.chars().all(|c| c.is_ascii_digit()));
        if rest_numeric && tokens.iter().any(|t| t.len() == 4) {
            return true;
        }
    }

    // "6/1/2025" or "2025-06-01"
    if tokens.len() == 1 {
        for sep in ['/', '-'] {
            let parts: Vec<&str> = first.split(sep).collect();
            if (2..=3).contains(&parts.len())
                && parts.iter().all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
            {
                return true;
            }
        }
    }
    false
}

/// Subtitle lines between the title and the body: capo/key/author notes and
/// dates, skipped before section parsing begins.
pub fn is_subtitle_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("capo") || lower.starts_with("key ") || lower.starts_with("by ") {
        return true;
    }
    // Capo shorthand like "3" or "1c"
    let mut chars = trimmed.chars();
    if trimmed.len() <= 3
        && chars.next().map_or(false, |c| c.is_ascii_digit())
        && trimmed.chars().filter(|c| c.is_ascii_alphabetic()).count() <= 1
        && trimmed.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return true;
    }
    // Author initial like "J. Hobbs"
    let bytes: Vec<char> = trimmed.chars().collect();
    if bytes.len() > 2
        && bytes[0].is_ascii_uppercase()
        && bytes[1] == '.'
        && bytes[2].is_whitespace()
    {
        return true;
    }
    is_date_line(trimmed)
}

/// Extract inline bracket chords from a line.
///
/// Returns `None` when the line carries no bracket chords. Each `[chord]` is
/// removed from the text and recorded at the position (in the post-removal
/// text) of the next character; a trailing bracket anchors at end-of-line.
/// Positions then pass through the snap engine so they land on word starts.
pub fn parse_inline_line(raw: &str, policy: &AlignPolicy) -> Option<Line> {
    let indent = indent_level(raw);
    let chars: Vec<char> = raw.trim().chars().collect();

    let mut out: Vec<char> = Vec::new();
    let mut found: Vec<(usize, String)> = Vec::new();
    let mut i = 0usize;

    while i < chars.len() {
        if chars[i] == '[' {
            if let Some(close) = chars[i + 1..].iter().position(|&c| c == ']') {
                let inner: String = chars[i + 1..i + 1 + close].iter().collect();
                if let Some(chord) = parse_chord(inner.trim()) {
                    found.push((out.len(), chord.symbol));
                    i += close + 2;
                    continue;
                }
            }
        }
        out.push(chars[i]);
        i += 1;
    }

    if found.is_empty() {
        return None;
    }

    // Strip the whitespace the removed brackets leave behind, shifting
    // offsets with the leading trim and clamping into the trailing one.
    let lead = out.iter().take_while(|c| c.is_whitespace()).count();
    let text_chars: Vec<char> = if lead == out.len() {
        Vec::new()
    } else {
        let tail = out.iter().rev().take_while(|c| c.is_whitespace()).count();
        out[lead..out.len() - tail].to_vec()
    };
    let text: String = text_chars.iter().collect();

    let mut placements: Vec<ChordPlacement> = Vec::new();
    for (raw_pos, symbol) in found {
        if text_chars.is_empty() {
            placements.push(ChordPlacement { chord: symbol, pos: 0 });
            continue;
        }
        let shifted = raw_pos.saturating_sub(lead).min(text_chars.len());
        let (pos, _) = snap_to_word_start(shifted, &text_chars, policy);
        placements.push(ChordPlacement { chord: symbol, pos });
    }
    finish_placements(&mut placements);

    Some(Line {
        indent,
        text,
        chords: placements,
    })
}
