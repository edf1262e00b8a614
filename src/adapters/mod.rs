//! Adapter interfaces for platform collaborators.
//!
//! The executor talks to two external systems: the media catalog it reads
//! songs from, and the indexing service that rescans storage roots. Both sit
//! behind traits so the core can run against SQLite, a subprocess, or test
//! doubles.

pub mod indexer;
pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::{Selection, SortClause};
use crate::domain::{EndpointRef, Value};

// Re-export the concrete adapters
pub use indexer::{CommandIndexer, NoopIndexer};
pub use sqlite::SqliteCatalog;

/// Errors from the catalog collaborator
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog query failed on {endpoint}: {message}")]
    Query { endpoint: String, message: String },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Catalog connection lock poisoned")]
    Poisoned,
}

/// Errors from the indexing collaborator
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("Failed to start indexer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Indexer timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Indexer exited with code {code}: {stderr}")]
    Failed { code: i32, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A forward-only set of result rows.
///
/// Rows are positional and line up with [`RowSet::column_names`]. The
/// underlying handle is released when the row set is dropped.
pub trait RowSet: Send {
    /// Names of the columns present in this result set
    fn column_names(&self) -> &[String];

    /// Advance to the next row; `Ok(None)` once exhausted
    fn next_row(&mut self) -> Result<Option<Vec<Value>>, CatalogError>;
}

/// The platform's media catalog
pub trait Catalog: Send + Sync {
    /// Human-readable catalog name
    fn name(&self) -> &str;

    /// Base content URI addressing rows read from `endpoint`.
    ///
    /// Fixed endpoints carry no volume of their own, so catalogs that map
    /// them must override this; `None` leaves rows without a `_uri`.
    fn content_uri(&self, endpoint: &EndpointRef) -> Option<String> {
        endpoint.content_uri()
    }

    /// Run a query against one endpoint.
    ///
    /// `Ok(None)` means the endpoint produced no result set at all (absent
    /// or unreadable); callers treat it as zero rows.
    fn execute_query(
        &self,
        endpoint: &EndpointRef,
        projection: &[&str],
        selection: Option<&Selection>,
        sort: &SortClause,
    ) -> Result<Option<Box<dyn RowSet>>, CatalogError>;
}

/// The platform's media indexing service
#[async_trait]
pub trait MediaIndexer: Send + Sync {
    /// Human-readable indexer name
    fn name(&self) -> &str;

    /// Ask the service to (re)index `roots` for files of `mime_type`.
    ///
    /// Completion of the scan itself is not reported back.
    async fn request_indexing(&self, roots: &[String], mime_type: &str)
        -> Result<(), IndexerError>;
}
