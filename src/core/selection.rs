//! WHERE clause construction for song queries.

use crate::domain::columns::DATA;

/// A parameterised WHERE expression with its positional arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// SQL expression using `?` placeholders
    pub clause: String,

    /// One argument per placeholder, in order
    pub args: Vec<String>,
}

impl Selection {
    /// Select songs whose path contains `<folder>/` anywhere.
    ///
    /// This is a substring match, not a folder-segment match: `Music` hits
    /// `Music/song.mp3` and `/storage/emulated/0/Music/song.mp3`, but also
    /// `OldMusic/song.mp3`. SQLite's LIKE ignores ASCII case, so `music/`
    /// hits as well. Returns `None` for an empty filter.
    pub fn path_filter(folder: &str) -> Option<Self> {
        let folder = folder.trim_end_matches('/');
        if folder.is_empty() {
            return None;
        }

        Some(Self {
            clause: format!("{} LIKE ? ESCAPE '\\'", DATA),
            args: vec![format!("%{}/%", escape_like(folder))],
        })
    }
}

/// Escape SQL LIKE wildcard characters so they are matched literally.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' | '%' | '_' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}
