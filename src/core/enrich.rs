//! Derived song fields the catalog does not store.

use std::path::Path;

use crate::domain::columns::{DATA, DISPLAY_NAME_WO_EXT, FILE_EXTENSION, ID, URI};
use crate::domain::{SongRecord, Value};

/// Add derived fields to a record.
///
/// - `file_extension` and `_display_name_wo_ext` come from the file name in
///   `_data` (null when the row has no path).
/// - `_uri` is `uri_base` with the row id appended; it is left out when
///   there is no base or the row has no usable `_id`.
pub fn enrich(record: &mut SongRecord, uri_base: Option<&str>) {
    let path = record.get_str(DATA).map(str::to_string);
    match path {
        Some(path) => {
            let (stem, extension) = split_file_name(&path);
            record.insert(FILE_EXTENSION, extension);
            record.insert(DISPLAY_NAME_WO_EXT, stem);
        }
        None => {
            record.insert(FILE_EXTENSION, Value::Null);
            record.insert(DISPLAY_NAME_WO_EXT, Value::Null);
        }
    }

    let id = record.get(ID).and_then(Value::as_i64);
    if let (Some(base), Some(id)) = (uri_base, id) {
        record.insert(URI, format!("{}/{}", base, id));
    }
}

/// File name of `path` split into stem and extension (empty if none)
fn split_file_name(path: &str) -> (String, String) {
    let path = Path::new(path);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    (stem, extension)
}
