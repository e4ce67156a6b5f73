//! Generated data file
//!
//! The one persisted artifact: a self-contained JS declaration the browser
//! viewer loads as its whole in-memory database. Field names and nesting are
//! the viewer's contract; this is the one place bit-exact compatibility
//! matters. The file carries no timestamp so rerunning an unchanged import
//! reproduces it byte for byte.
//!
//! Writes go to a sibling temp file and are renamed into place, so a failure
//! mid-write never truncates the previous database.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::ChartError;
use crate::song::Song;

const HEADER: &str = "// Generated by chordbook; manual edits are preserved on rebuild\n";
const DECLARATION: &str = "const SONGS = ";

/// Render the full data file contents.
pub fn render(songs: &[Song]) -> Result<String, ChartError> {
    let json = serde_json::to_string_pretty(songs)?;
    Ok(format!("{}{}{};\n", HEADER, DECLARATION, json))
}

/// Write the data file atomically: temp sibling first, then rename.
pub fn write_atomic(path: &Path, songs: &[Song]) -> Result<(), ChartError> {
    let rendered = render(songs)?;
    let tmp = temp_path(path);
    fs::write(&tmp, rendered).map_err(|source| ChartError::Write {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| ChartError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Load the existing database, tolerating its absence.
///
/// An unparsable file is warned about and treated as empty rather than
/// aborting the run; the atomic write still protects against truncation.
pub fn load_existing(path: &Path) -> Vec<Song> {
    if !path.exists() {
        return Vec::new();
    }
    match try_load(path) {
        Ok(songs) => songs,
        Err(message) => {
            warn!(path = %path.display(), %message, "could not load existing data file, starting empty");
            Vec::new()
        }
    }
}

fn try_load(path: &Path) -> Result<Vec<Song>, String> {
    let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let json = songs_array(&content).ok_or("no SONGS declaration found")?;
    serde_json::from_str(json).map_err(|e| e.to_string())
}

/// Slice the JSON array out of `const SONGS = [...];`.
fn songs_array(content: &str) -> Option<&str> {
    let at = content.find(DECLARATION.trim_end())?;
    let rest = &content[at..];
    let open = rest.find('[')?;
    let close = rest.rfind(']')?;
    if close < open {
        return None;
    }
    Some(&rest[open..=close])
}
