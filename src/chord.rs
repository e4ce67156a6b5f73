//! Chord symbol grammar
//!
//! Validates whitespace-delimited tokens against the supported chord grammar and
//! extracts chord roots for key detection. A token that fails the grammar is
//! never treated as a chord; it stays ordinary lyric text.

/// A parsed chord symbol.
///
/// `symbol` is the cleaned token (trailing punctuation and the `bar` barre
/// suffix stripped) and is what gets stored in the generated data file.
#[derive(Debug, Clone, PartialEq)]
pub struct Chord {
    pub symbol: String,
    pub root: String,
    pub bass: Option<String>,
}

/// Parse a single token against the chord grammar.
///
/// Grammar: root note `A`-`G` with optional `#`/`b`, optional quality suffix
/// (`m`, `maj`, `min`, `dim`, `aug`, `sus`, `sus2`, `sus4`, `add<digits>`),
/// optional extension digits (`7`, `9`, `2`, ...), optional slash bass
/// (`/<note>`). Trailing `.,;:` punctuation and the `bar` barre-chord suffix
/// are stripped before matching.
///
/// # Examples
/// ```
/// use chordbook::chord::parse_chord;
///
/// let c = parse_chord("G#m7").unwrap();
/// assert_eq!(c.root, "G#");
/// assert_eq!(c.symbol, "G#m7");
///
/// let slash = parse_chord("F#/C#").unwrap();
/// assert_eq!(slash.bass.as_deref(), Some("C#"));
///
/// assert!(parse_chord("Grace").is_none());
/// ```
pub fn parse_chord(token: &str) -> Option<Chord> {
    let mut cleaned = token.trim_end_matches(|c| matches!(c, '.' | ',' | ';' | ':'));

    // "Gbar" / "G7bar" barre notation collapses to the plain chord
    while cleaned.len() > 3 && cleaned.ends_with("bar") {
        cleaned = &cleaned[..cleaned.len() - 3];
    }

    let (root, rest) = split_root(cleaned)?;
    let rest = strip_quality(rest);
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_digit());

    let bass = match rest.strip_prefix('/') {
        Some(after) => {
            let (bass_root, leftover) = split_root(after)?;
            if !leftover.is_empty() {
                return None;
            }
            Some(bass_root.to_string())
        }
        None => {
            if !rest.is_empty() {
                return None;
            }
            None
        }
    };

    Some(Chord {
        symbol: cleaned.to_string(),
        root: root.to_string(),
        bass,
    })
}

/// Shorthand for "does this token parse as a chord".
pub fn is_chord_token(token: &str) -> bool {
    parse_chord(token).is_some()
}

/// Split the leading root note (`A`-`G` plus optional accidental) off a token.
fn split_root(s: &str) -> Option<(&str, &str)> {
    let first = s.chars().next()?;
    if !('A'..='G').contains(&first) {
        return None;
    }
    match s[1..].chars().next() {
        Some('#') | Some('b') => Some((&s[..2], &s[2..])),
        _ => Some((&s[..1], &s[1..])),
    }
}

/// Strip an optional quality suffix, longest alternative first so `maj`
/// is not consumed as `m` + `aj`.
fn strip_quality(s: &str) -> &str {
    for q in ["maj", "min", "dim", "aug", "sus4", "sus2", "sus"] {
        if let Some(rest) = s.strip_prefix(q) {
            return rest;
        }
    }
    if let Some(rest) = s.strip_prefix("add") {
        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits > 0 {
            return &rest[digits..];
        }
        // "add" without digits is not a quality; the caller rejects the remainder
        return s;
    }
    s.strip_prefix('m').unwrap_or(s)
}

/// Detect a song's key from the most common chord root across all placements.
///
/// Falls back to `"C"` when the song carries no chords at all. Ties go to the
/// root seen first.
pub fn detect_key<'a, I>(roots: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    for root in roots {
        match counts.iter_mut().find(|(r, _)| r == root) {
            Some((_, n)) => *n += 1,
            None => counts.push((root.to_string(), 1)),
        }
    }
    counts
        .into_iter()
        .max_by_key(|(_, n)| *n)
        .map(|(r, _)| r)
        .unwrap_or_else(|| "C".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_roots() {
        for t in ["A", "B", "C", "D", "E", "F", "G"] {
            assert!(is_chord_token(t), "{} should be a chord", t);
        }
        assert!(!is_chord_token("H"));
        assert!(!is_chord_token("a"));
    }

    #[test]
    fn test_accidentals_and_qualities() {
        assert!(is_chord_token("F#"));
        assert!(is_chord_token("Eb"));
        assert!(is_chord_token("Am"));
        assert!(is_chord_token("Am7"));
        assert!(is_chord_token("Cmaj7"));
        assert!(is_chord_token("Dsus4"));
        assert!(is_chord_token("Dsus"));
        assert!(is_chord_token("Gadd9"));
        assert!(is_chord_token("Bdim"));
        assert!(is_chord_token("Caug"));
        assert!(is_chord_token("C2"));
        assert!(is_chord_token("G7"));
    }

    #[test]
    fn test_slash_bass() {
        let c = parse_chord("G/B").unwrap();
        assert_eq!(c.root, "G");
        assert_eq!(c.bass.as_deref(), Some("B"));
        assert!(is_chord_token("F#/C#"));
        // Trailing garbage after the bass note is not a chord
        assert!(!is_chord_token("G/Bx"));
        assert!(!is_chord_token("G/"));
    }

    #[test]
    fn test_lyric_words_rejected() {
        for t in ["Grace", "Amazing", "Go", "Dad", "Bob", "add", "bar", "Gsu"] {
            assert!(!is_chord_token(t), "{} should not be a chord", t);
        }
    }

    #[test]
    fn test_barre_and_punctuation_stripping() {
        let c = parse_chord("Gbar").unwrap();
        assert_eq!(c.symbol, "G");
        let c = parse_chord("G7bar").unwrap();
        assert_eq!(c.symbol, "G7");
        let c = parse_chord("Am,").unwrap();
        assert_eq!(c.symbol, "Am");
        assert!(is_chord_token("C."));
    }

    #[test]
    fn test_detect_key_majority_root() {
        let roots = ["G", "C", "G", "D", "G"];
        assert_eq!(detect_key(roots.iter().copied()), "G");
        assert_eq!(detect_key(std::iter::empty()), "C");
    }
}
