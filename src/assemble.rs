//! # Song assembly
//!
//! Folds a document's lines into the Song/Section/Line tree:
//!
//! 1. Leading blanks and date headers are dropped.
//! 2. The first short, plain line before any chord content or section label
//!    becomes the title; otherwise the cleaned filename does.
//! 3. Subtitle lines (capo, key, author, dates) after the title are dropped.
//! 4. The body folds into sections: labels open sections, chords-only lines
//!    pair with the lyric line below them through the alignment engine,
//!    inline-bracket lines parse in place, everything else is plain lyrics.
//! 5. When the file has no labels at all, sections are inferred from indent
//!    changes between contiguous runs of lines.
//!
//! A classified chord file always produces a Song; a file whose every line
//! was consumed as title/labels/blanks still yields one empty section and is
//! flagged degenerate by the caller.

use std::path::Path;

use crate::align::{merge_columns, AlignPolicy};
use crate::classify::{has_inline_chords, is_chord_line, ClassifyPolicy};
use crate::parser::{
    indent_level, is_date_line, is_subtitle_line, parse_inline_line, parse_section_label,
};
use crate::song::{Line, Section, Song};

/// Maximum character count for a title line.
pub const TITLE_MAX_CHARS: usize = 80;

/// Assemble one Song from a chord file's plain-text lines.
pub fn assemble_song(
    lines: &[&str],
    filename: &str,
    classify: &ClassifyPolicy,
    align: &AlignPolicy,
) -> Song {
    // Drop leading blanks and date headers
    let mut start = 0usize;
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_date_line(trimmed) {
            start = i + 1;
            continue;
        }
        break;
    }
    let lines = &lines[start..];

    let (title, title_end) = find_title(lines, classify);
    let title = title.unwrap_or_else(|| title_from_filename(filename));

    let body = &lines[title_end..];
    let body_start = skip_subtitles(body, classify);

    let (mut sections, any_label) = fold_sections(&body[body_start..], classify, align);

    if !any_label {
        sections = infer_sections_by_indent(sections);
    }

    for section in &mut sections {
        normalize_blanks(&mut section.lines);
    }
    sections.retain(|s| !s.lines.is_empty());
    if sections.is_empty() {
        sections.push(Section::unlabeled());
    }

    Song { title, sections }
}

/// Scan for a title: the first short plain line that precedes any chord
/// content or section label. Lines at or past content are lyrics, not titles.
fn find_title(lines: &[&str], classify: &ClassifyPolicy) -> (Option<String>, usize) {
    let mut saw_content = false;
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if parse_section_label(trimmed).is_some()
            || is_chord_line(line, classify)
            || has_inline_chords(line)
        {
            saw_content = true;
            continue;
        }
        if saw_content {
            break;
        }
        if trimmed.chars().count() < TITLE_MAX_CHARS {
            return (Some(trimmed.to_string()), i + 1);
        }
    }
    (None, 0)
}

/// Skip blanks and subtitle lines between the title and the first body line.
fn skip_subtitles(body: &[&str], classify: &ClassifyPolicy) -> usize {
    let mut idx = 0usize;
    while idx < body.len() {
        let trimmed = body[idx].trim();
        if trimmed.is_empty() {
            idx += 1;
            continue;
        }
        if is_chord_line(body[idx], classify)
            || has_inline_chords(body[idx])
            || parse_section_label(trimmed).is_some()
        {
            break;
        }
        if is_subtitle_line(trimmed) {
            idx += 1;
            continue;
        }
        break;
    }
    idx
}

/// Fold body lines into sections. Returns the sections plus whether any
/// explicit label was seen (drives the indent-inference fallback).
fn fold_sections(
    body: &[&str],
    classify: &ClassifyPolicy,
    align: &AlignPolicy,
) -> (Vec<Section>, bool) {
    let mut sections: Vec<Section> = Vec::new();
    let mut current = Section::unlabeled();
    let mut any_label = false;
    let mut i = 0usize;

    while i < body.len() {
        let line = body[i];
        let trimmed = line.trim();

        if trimmed.is_empty() {
            if !current.lines.is_empty() {
                current.lines.push(Line::blank());
            }
            i += 1;
            continue;
        }

        if let Some(label) = parse_section_label(trimmed) {
            if !current.lines.is_empty() {
                sections.push(current);
            }
            current = Section::labeled(label);
            any_label = true;
            i += 1;
            continue;
        }

        if is_chord_line(line, classify) {
            // Pair with the lyric line below, skipping blank rows between
            let mut j = i + 1;
            while j < body.len() && body[j].trim().is_empty() {
                j += 1;
            }
            let has_lyric = j < body.len()
                && !is_chord_line(body[j], classify)
                && parse_section_label(body[j].trim()).is_none();

            if has_lyric {
                current
                    .lines
                    .push(merge_columns(line, body[j], indent_level(body[j]), align));
                i = j + 1;
            } else {
                // Chords with no lyric beneath: an instrumental row
                let merged = merge_columns(line, "", 0, align);
                if !merged.chords.is_empty() {
                    current.lines.push(merged);
                }
                i += 1;
            }
            continue;
        }

        if let Some(inline) = parse_inline_line(line, align) {
            current.lines.push(inline);
            i += 1;
            continue;
        }

        current.lines.push(Line {
            indent: indent_level(line),
            text: trimmed.to_string(),
            chords: Vec::new(),
        });
        i += 1;
    }

    if !current.lines.is_empty() {
        sections.push(current);
    }
    (sections, any_label)
}

/// Indentation fallback: with no explicit labels anywhere, contiguous runs of
/// lines sharing an indent bucket become their own (unlabeled) sections.
fn infer_sections_by_indent(sections: Vec<Section>) -> Vec<Section> {
    let lines: Vec<Line> = sections.into_iter().flat_map(|s| s.lines).collect();

    let mut out: Vec<Section> = Vec::new();
    let mut current = Section::unlabeled();
    let mut prev_indent: Option<u8> = None;

    for line in lines {
        if line.is_blank() {
            current.lines.push(line);
            continue;
        }
        if let Some(prev) = prev_indent {
            if line.indent != prev && !current.lines.is_empty() {
                out.push(std::mem::replace(&mut current, Section::unlabeled()));
            }
        }
        prev_indent = Some(line.indent);
        current.lines.push(line);
    }
    if !current.lines.is_empty() {
        out.push(current);
    }
    out
}

/// Trim blank lines at section edges and collapse interior runs to one.
fn normalize_blanks(lines: &mut Vec<Line>) {
    while lines.last().map_or(false, |l| l.is_blank()) {
        lines.pop();
    }
    let lead = lines.iter().take_while(|l| l.is_blank()).count();
    lines.drain(..lead);
    lines.dedup_by(|a, b| a.is_blank() && b.is_blank());
}

/// Derive a title from the source filename: extension off, a trailing
/// "chord(s)" marker off, dash/underscore runs to spaces.
pub fn title_from_filename(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);

    let mut name = stem.to_string();
    let lower = name.to_ascii_lowercase();
    for suffix in ["chords", "chord"] {
        if lower.ends_with(suffix) {
            name.truncate(name.len() - suffix.len());
            break;
        }
    }

    let spaced: String = name
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect();
    let cleaned = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        stem.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assemble(lines: &[&str], filename: &str) -> Song {
        assemble_song(
            lines,
            filename,
            &ClassifyPolicy::default(),
            &AlignPolicy::default(),
        )
    }

    #[test]
    fn test_title_skips_date_and_label() {
        // A date header, then the title, then a section label
        let song = assemble(
            &["Sunday June 1", "Amazing Grace", "[Verse 1]", "G", "Amazing grace"],
            "amazing.docx",
        );
        assert_eq!(song.title, "Amazing Grace");
        assert_eq!(song.sections.len(), 1);
        assert_eq!(song.sections[0].label.as_deref(), Some("Verse 1"));
    }

    #[test]
    fn test_title_falls_back_to_filename() {
        let song = assemble(&["[Verse 1]", "G      C", "Amazing grace"], "Amazing Grace - Chords.docx");
        assert_eq!(song.title, "Amazing Grace");
    }

    #[test]
    fn test_filename_cleanup() {
        assert_eq!(title_from_filename("as_the_deer.odt"), "as the deer");
        assert_eq!(title_from_filename("Amazing Grace - Chords.docx"), "Amazing Grace");
        assert_eq!(title_from_filename("How-Great-Thou-Art.doc"), "How Great Thou Art");
    }

    #[test]
    fn test_chord_lyric_pairing() {
        let song = assemble(
            &["My Song", "", "G        C", "Amazing grace", "D", "how sweet"],
            "f.docx",
        );
        let lines = &song.sections[0].lines;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Amazing grace");
        assert_eq!(lines[0].chords.len(), 2);
        assert_eq!(lines[1].text, "how sweet");
        assert_eq!(lines[1].chords[0].chord, "D");
    }

    #[test]
    fn test_pairing_skips_blank_between() {
        let song = assemble(&["My Song", "", "G", "", "Amazing grace"], "f.docx");
        let lines = &song.sections[0].lines;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Amazing grace");
        assert_eq!(lines[0].chords[0].chord, "G");
    }

    #[test]
    fn test_chord_only_row_without_lyric() {
        let song = assemble(&["My Song", "", "[Intro]", "G   C   D", "[Verse 1]", "G", "la la"], "f.docx");
        assert_eq!(song.sections.len(), 2);
        let intro = &song.sections[0];
        assert_eq!(intro.label.as_deref(), Some("Intro"));
        assert_eq!(intro.lines.len(), 1);
        assert_eq!(intro.lines[0].text, "");
        assert_eq!(intro.lines[0].chords.len(), 3);
    }

    #[test]
    fn test_implicit_leading_section() {
        let song = assemble(
            &["My Song", "", "G", "before any label", "[Chorus]", "C", "in the chorus"],
            "f.docx",
        );
        assert_eq!(song.sections.len(), 2);
        assert_eq!(song.sections[0].label, None);
        assert_eq!(song.sections[1].label.as_deref(), Some("Chorus"));
    }

    #[test]
    fn test_inline_body_lines() {
        let song = assemble(
            &["My Song", "", "[G]Amazing [C]grace how [G]sweet the sound"],
            "f.docx",
        );
        let line = &song.sections[0].lines[0];
        assert_eq!(line.text, "Amazing grace how sweet the sound");
        assert_eq!(line.chords.len(), 3);
    }

    #[test]
    fn test_indent_inference_without_labels() {
        let song = assemble(
            &[
                "My Song",
                "",
                "G",
                "verse line one",
                "C",
                "verse line two",
                "",
                "\tG",
                "\tchorus line one",
            ],
            "f.docx",
        );
        assert_eq!(song.sections.len(), 2);
        assert_eq!(song.sections[0].label, None);
        assert_eq!(song.sections[1].label, None);
        assert_eq!(song.sections[1].lines[0].indent, 1);
    }

    #[test]
    fn test_subtitle_lines_skipped() {
        let song = assemble(
            &["My Song", "Capo 3", "by John Newton", "", "G", "first real line"],
            "f.docx",
        );
        assert_eq!(song.sections[0].lines[0].text, "first real line");
    }

    #[test]
    fn test_degenerate_song_keeps_one_section() {
        let song = assemble(&["My Song", "", "[Verse 1]"], "f.docx");
        assert_eq!(song.sections.len(), 1);
        assert!(song.is_degenerate());
    }

    #[test]
    fn test_blank_normalization() {
        let song = assemble(
            &["My Song", "", "G", "one", "", "", "C", "two", ""],
            "f.docx",
        );
        let lines = &song.sections[0].lines;
        // one, single blank, two
        assert_eq!(lines.len(), 3);
        assert!(lines[1].is_blank());
    }
}
