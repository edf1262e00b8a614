//! Domain types for song queries.
//!
//! This module contains the request a caller sends, the endpoints a query can
//! target, the catalog's song column table, and the records handed back.

pub mod columns;
pub mod endpoint;
pub mod record;
pub mod request;

// Re-export main types
pub use endpoint::{volume_content_uri, EndpointRef, ScopeSelector};
pub use record::{SongRecord, Value};
pub use request::{RawSongQuery, RequestError, SongQuery, SongSortField, SortOrder};
