//! Song columns of the media catalog.
//!
//! The catalog exposes one row per audio file. The projection below is the
//! full known column set requested for every song query; [`ColumnKind`]
//! decides how a raw column value is typed in a [`SongRecord`].
//!
//! [`SongRecord`]: super::record::SongRecord

/// Absolute path of the file on disk
pub const DATA: &str = "_data";
/// File name including extension
pub const DISPLAY_NAME: &str = "_display_name";
/// Row identifier within its endpoint
pub const ID: &str = "_id";
/// File size in bytes
pub const SIZE: &str = "_size";
pub const ALBUM: &str = "album";
pub const ALBUM_ID: &str = "album_id";
pub const ARTIST: &str = "artist";
pub const ARTIST_ID: &str = "artist_id";
pub const BOOKMARK: &str = "bookmark";
pub const COMPOSER: &str = "composer";
pub const DATE_ADDED: &str = "date_added";
pub const DATE_MODIFIED: &str = "date_modified";
pub const DURATION: &str = "duration";
pub const TITLE: &str = "title";
pub const TRACK: &str = "track";
pub const IS_ALARM: &str = "is_alarm";
pub const IS_AUDIOBOOK: &str = "is_audiobook";
pub const IS_MUSIC: &str = "is_music";
pub const IS_NOTIFICATION: &str = "is_notification";
pub const IS_PODCAST: &str = "is_podcast";
pub const IS_RINGTONE: &str = "is_ringtone";

/// Lower-cased title used by the catalog's default ordering
pub const TITLE_KEY: &str = "title_key";

/// Derived: file extension of `_data`
pub const FILE_EXTENSION: &str = "file_extension";
/// Derived: file name of `_data` without extension
pub const DISPLAY_NAME_WO_EXT: &str = "_display_name_wo_ext";
/// Derived: content URI addressing this row
pub const URI: &str = "_uri";

/// Number of derived fields added to every record
pub const DERIVED_FIELD_COUNT: usize = 3;

/// Every column requested by a song query, in projection order.
pub const SONG_PROJECTION: &[&str] = &[
    DATA,
    DISPLAY_NAME,
    ID,
    SIZE,
    ALBUM,
    ALBUM_ID,
    ARTIST,
    ARTIST_ID,
    BOOKMARK,
    COMPOSER,
    DATE_ADDED,
    DATE_MODIFIED,
    DURATION,
    TITLE,
    TRACK,
    IS_ALARM,
    IS_AUDIOBOOK,
    IS_MUSIC,
    IS_NOTIFICATION,
    IS_PODCAST,
    IS_RINGTONE,
];

/// How a catalog column is typed once copied into a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Integer counters, ids, sizes and timestamps
    Integer,
    /// Flags stored as 0/1
    Boolean,
    /// Everything else
    Text,
}

impl ColumnKind {
    /// Kind of a column by name. Unknown columns are treated as text.
    pub fn of(column: &str) -> Self {
        match column {
            ID | SIZE | ALBUM_ID | ARTIST_ID | BOOKMARK | DATE_ADDED | DATE_MODIFIED
            | DURATION | TRACK => ColumnKind::Integer,
            IS_ALARM | IS_AUDIOBOOK | IS_MUSIC | IS_NOTIFICATION | IS_PODCAST
            | IS_RINGTONE => ColumnKind::Boolean,
            _ => ColumnKind::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_kinds() {
        assert_eq!(ColumnKind::of(ID), ColumnKind::Integer);
        assert_eq!(ColumnKind::of(DURATION), ColumnKind::Integer);
        assert_eq!(ColumnKind::of(IS_MUSIC), ColumnKind::Boolean);
        assert_eq!(ColumnKind::of(TITLE), ColumnKind::Text);
        assert_eq!(ColumnKind::of("something_new"), ColumnKind::Text);
    }

    #[test]
    fn test_projection_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for column in SONG_PROJECTION {
            assert!(seen.insert(*column), "duplicate column {column}");
        }
        assert!(!SONG_PROJECTION.contains(&TITLE_KEY));
    }
}
