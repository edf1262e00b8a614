//! songscope - Query facade over a platform media catalog
//!
//! Answers "give me the songs" requests against a media catalog whose
//! storage model differs across platform generations: one global store on
//! older platforms, one store per storage volume on newer ones.
//!
//! # Architecture
//!
//! A request flows through four pieces:
//! - Sort: the caller's sort field/order becomes an ORDER BY clause
//! - Scope: the scope selector becomes a list of endpoints plus the
//!   filesystem roots backing them
//! - Indexing: roots not seen before are sent to the indexing service once,
//!   without waiting for the scan
//! - Executor: each endpoint is queried in order and every row becomes an
//!   enriched [`SongRecord`]
//!
//! # Modules
//!
//! - `adapters`: Catalog and indexer interfaces (SQLite, subprocess)
//! - `core`: Query logic (sort, selection, scope, indexing, executor)
//! - `domain`: Data structures (SongQuery, EndpointRef, SongRecord)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # All songs under Music/, newest first
//! songscope songs --path Music --sort date-added --order desc
//!
//! # Where would a scope look?
//! songscope scope --scope 0
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use adapters::{Catalog, CommandIndexer, MediaIndexer, NoopIndexer, RowSet, SqliteCatalog};
pub use crate::core::{IndexedRoots, PlatformInfo, QueryError, QueryExecutor, StorageVolume};
pub use domain::{EndpointRef, RawSongQuery, ScopeSelector, SongQuery, SongRecord, Value};
