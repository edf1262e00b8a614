//! Core query logic.
//!
//! This module contains:
//! - Sort: ORDER BY construction
//! - Selection: path filter construction
//! - Scope: endpoint and root resolution across storage generations
//! - Indexing: once-per-root indexing request deduplication
//! - Enrich: derived record fields
//! - Executor: the song query pipeline

pub mod enrich;
pub mod executor;
pub mod indexing;
pub mod scope;
pub mod selection;
pub mod sort;

// Re-export commonly used types
pub use enrich::enrich;
pub use executor::{QueryError, QueryExecutor, QueryExecutorBuilder, AUDIO_MIME_TYPE};
pub use indexing::IndexedRoots;
pub use scope::{resolve, volume_root, PlatformInfo, ScopeResolution, StorageVolume};
pub use selection::Selection;
pub use sort::{SortClause, DEFAULT_SORT_ORDER};
