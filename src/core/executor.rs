//! Song query execution.
//!
//! Ties the pieces together for one request: builds the sort and selection,
//! resolves the endpoints, fires an indexing request for roots not seen
//! before, then reads every endpoint into enriched [`SongRecord`]s.
//!
//! Indexing requests run in the background. Short-lived callers such as the
//! CLI call [`QueryExecutor::drain`] before shutting the runtime down, since
//! dropping the runtime cancels any request still in flight.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::adapters::{Catalog, MediaIndexer, RowSet};
use crate::domain::columns::{DERIVED_FIELD_COUNT, SONG_PROJECTION};
use crate::domain::{EndpointRef, RawSongQuery, RequestError, SongQuery, SongRecord};

use super::enrich::enrich;
use super::indexing::IndexedRoots;
use super::scope::{resolve, PlatformInfo};
use super::selection::Selection;
use super::sort::SortClause;

/// MIME type passed to the indexer for song queries
pub const AUDIO_MIME_TYPE: &str = "audio/*";

/// Errors surfaced to the caller of a query
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Required dependency '{0}' was not set")]
    UnresolvedState(&'static str),

    #[error(transparent)]
    InvalidRequest(#[from] RequestError),

    #[error("Query task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Executes song queries against a catalog
pub struct QueryExecutor {
    catalog: Arc<dyn Catalog>,
    indexer: Arc<dyn MediaIndexer>,
    indexed_roots: Arc<IndexedRoots>,
    mime_type: String,

    /// Indexing requests not yet awaited
    pending_scans: Mutex<Vec<JoinHandle<()>>>,
}

impl QueryExecutor {
    pub fn builder() -> QueryExecutorBuilder {
        QueryExecutorBuilder::default()
    }

    /// Roots already sent for indexing by this executor
    pub fn indexed_roots(&self) -> &Arc<IndexedRoots> {
        &self.indexed_roots
    }

    /// Decode a bridge request and run it
    pub async fn query_raw(
        &self,
        raw: RawSongQuery,
        platform: &PlatformInfo,
    ) -> Result<Vec<SongRecord>, QueryError> {
        let query = SongQuery::try_from(raw)?;
        self.query_songs(&query, platform).await
    }

    /// Run a song query.
    ///
    /// Catalog reads happen on the blocking pool, never on the calling task.
    /// Records come back grouped by endpoint in resolution order; sorting
    /// applies within each endpoint only.
    #[instrument(skip(self, platform))]
    pub async fn query_songs(
        &self,
        query: &SongQuery,
        platform: &PlatformInfo,
    ) -> Result<Vec<SongRecord>, QueryError> {
        let sort = SortClause::build(query.sort_field, query.sort_order, query.ignore_case);
        let selection = query.path_filter.as_deref().and_then(Selection::path_filter);
        let scope = resolve(query.scope, platform);

        debug!(
            %sort,
            selection = ?selection.as_ref().map(|s| &s.clause),
            endpoints = ?scope.endpoints,
            "Query config"
        );

        self.ensure_indexed(&scope.root_paths);

        let catalog = Arc::clone(&self.catalog);
        let endpoints = scope.endpoints;
        let songs = tokio::task::spawn_blocking(move || {
            load_songs(catalog.as_ref(), &endpoints, selection.as_ref(), &sort)
        })
        .await?;

        info!(count = songs.len(), "Song query complete");
        Ok(songs)
    }

    /// Run a query on a background task and hand back its handle
    pub fn spawn_query(
        self: &Arc<Self>,
        query: SongQuery,
        platform: PlatformInfo,
    ) -> JoinHandle<Result<Vec<SongRecord>, QueryError>> {
        let executor = Arc::clone(self);
        tokio::spawn(async move { executor.query_songs(&query, &platform).await })
    }

    /// Request indexing for roots this executor has not seen yet.
    ///
    /// Fire-and-forget: the scan never blocks or fails the query, and a
    /// root stays admitted even if its request fails.
    fn ensure_indexed(&self, roots: &BTreeSet<String>) {
        let pending: Vec<String> = self.indexed_roots.admit(roots).into_iter().collect();
        if pending.is_empty() {
            return;
        }

        info!(roots = ?pending, "Requesting indexing for new roots");

        let indexer = Arc::clone(&self.indexer);
        let mime_type = self.mime_type.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = indexer.request_indexing(&pending, &mime_type).await {
                warn!(indexer = indexer.name(), error = %e, "Failed to trigger media scan");
            }
        });

        let mut scans = self.lock_pending_scans();
        scans.retain(|scan| !scan.is_finished());
        scans.push(handle);
    }

    /// Wait for every indexing request issued so far to finish.
    ///
    /// Queries never wait on indexing; this is for callers about to drop
    /// the runtime. Failures were already logged by the request itself.
    pub async fn drain(&self) {
        let scans = std::mem::take(&mut *self.lock_pending_scans());
        if scans.is_empty() {
            return;
        }

        debug!(count = scans.len(), "Waiting for indexing requests");
        for scan in scans {
            if let Err(e) = scan.await {
                warn!(error = %e, "Indexing task did not complete");
            }
        }
    }

    /// Number of indexing requests not yet finished or drained
    pub fn pending_scans(&self) -> usize {
        self.lock_pending_scans()
            .iter()
            .filter(|scan| !scan.is_finished())
            .count()
    }

    fn lock_pending_scans(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
        // The guarded list stays consistent even if a holder panicked
        self.pending_scans
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Builder for [`QueryExecutor`]
#[derive(Default)]
pub struct QueryExecutorBuilder {
    catalog: Option<Arc<dyn Catalog>>,
    indexer: Option<Arc<dyn MediaIndexer>>,
    indexed_roots: Option<Arc<IndexedRoots>>,
    mime_type: Option<String>,
}

impl QueryExecutorBuilder {
    pub fn catalog(mut self, catalog: Arc<dyn Catalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn indexer(mut self, indexer: Arc<dyn MediaIndexer>) -> Self {
        self.indexer = Some(indexer);
        self
    }

    /// Share a set of indexed roots; a fresh set is used otherwise
    pub fn indexed_roots(mut self, roots: Arc<IndexedRoots>) -> Self {
        self.indexed_roots = Some(roots);
        self
    }

    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn build(self) -> Result<QueryExecutor, QueryError> {
        Ok(QueryExecutor {
            catalog: self.catalog.ok_or(QueryError::UnresolvedState("catalog"))?,
            indexer: self.indexer.ok_or(QueryError::UnresolvedState("indexer"))?,
            indexed_roots: self.indexed_roots.unwrap_or_default(),
            mime_type: self.mime_type.unwrap_or_else(|| AUDIO_MIME_TYPE.to_string()),
            pending_scans: Mutex::new(Vec::new()),
        })
    }
}

/// Read every endpoint in order.
///
/// An endpoint with no result set, or whose query fails, contributes no
/// rows; the other endpoints are still read.
fn load_songs(
    catalog: &dyn Catalog,
    endpoints: &[EndpointRef],
    selection: Option<&Selection>,
    sort: &SortClause,
) -> Vec<SongRecord> {
    let mut songs = Vec::new();

    for endpoint in endpoints {
        match catalog.execute_query(endpoint, SONG_PROJECTION, selection, sort) {
            Ok(Some(rows)) => {
                let uri_base = catalog.content_uri(endpoint);
                let count = read_rows(rows, endpoint, uri_base.as_deref(), &mut songs);
                debug!(%endpoint, count, "Rows read");
            }
            Ok(None) => {
                warn!(%endpoint, catalog = catalog.name(), "No result set, treating as empty");
            }
            Err(e) => {
                warn!(%endpoint, error = %e, "Catalog query failed, skipping endpoint");
            }
        }
    }

    songs
}

/// Turn each row into an enriched record. The row set is released on
/// return, including when iteration fails midway.
fn read_rows(
    mut rows: Box<dyn RowSet>,
    endpoint: &EndpointRef,
    uri_base: Option<&str>,
    out: &mut Vec<SongRecord>,
) -> usize {
    let columns = rows.column_names().to_vec();
    let mut count = 0;

    loop {
        match rows.next_row() {
            Ok(Some(values)) => {
                let mut record = SongRecord::with_capacity(columns.len() + DERIVED_FIELD_COUNT);
                for (column, value) in columns.iter().zip(values) {
                    record.insert(column.as_str(), value);
                }
                enrich(&mut record, uri_base);
                out.push(record);
                count += 1;
            }
            Ok(None) => break,
            Err(e) => {
                warn!(%endpoint, error = %e, read = count, "Row iteration failed");
                break;
            }
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{CatalogError, NoopIndexer, SqliteCatalog};
    use crate::domain::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Row set yielding fixed rows, then optionally an error, counting drops
    struct ScriptedRows {
        columns: Vec<String>,
        rows: std::vec::IntoIter<Vec<Value>>,
        fail_at_end: bool,
        released: Arc<AtomicUsize>,
    }

    impl RowSet for ScriptedRows {
        fn column_names(&self) -> &[String] {
            &self.columns
        }

        fn next_row(&mut self) -> Result<Option<Vec<Value>>, CatalogError> {
            match self.rows.next() {
                Some(row) => Ok(Some(row)),
                None if self.fail_at_end => Err(CatalogError::Query {
                    endpoint: "scripted".to_string(),
                    message: "device went away".to_string(),
                }),
                None => Ok(None),
            }
        }
    }

    impl Drop for ScriptedRows {
        fn drop(&mut self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_row_set_released_on_error() {
        let released = Arc::new(AtomicUsize::new(0));
        let rows = Box::new(ScriptedRows {
            columns: vec!["_id".to_string(), "_data".to_string()],
            rows: vec![vec![Value::Integer(1), Value::from("/sd/a.mp3")]].into_iter(),
            fail_at_end: true,
            released: Arc::clone(&released),
        });

        let mut out = Vec::new();
        let count = read_rows(
            rows,
            &EndpointRef::External,
            Some("content://media/external/audio/media"),
            &mut out,
        );

        assert_eq!(count, 1);
        assert_eq!(out.len(), 1);
        assert_eq!(
            out[0].get_str(crate::domain::columns::URI),
            Some("content://media/external/audio/media/1")
        );
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_builder_requires_dependencies() {
        let result = QueryExecutor::builder().build();
        assert!(matches!(result, Err(QueryError::UnresolvedState("catalog"))));

        let catalog: Arc<dyn Catalog> = Arc::new(SqliteCatalog::in_memory().unwrap());
        let result = QueryExecutor::builder().catalog(catalog).build();
        assert!(matches!(result, Err(QueryError::UnresolvedState("indexer"))));
    }

    #[tokio::test]
    async fn test_invalid_raw_request() {
        let executor = QueryExecutor::builder()
            .catalog(Arc::new(SqliteCatalog::in_memory().unwrap()))
            .indexer(Arc::new(NoopIndexer))
            .build()
            .unwrap();

        let raw = RawSongQuery {
            sort_type: Some(99),
            ..Default::default()
        };
        let result = executor.query_raw(raw, &PlatformInfo::legacy("/sdcard")).await;
        assert!(matches!(result, Err(QueryError::InvalidRequest(_))));
        assert!(executor.indexed_roots().is_empty());
    }

    /// Indexer that takes a while to answer
    struct SlowIndexer {
        delay: std::time::Duration,
        completed: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl MediaIndexer for SlowIndexer {
        fn name(&self) -> &str {
            "slow"
        }

        async fn request_indexing(
            &self,
            _roots: &[String],
            _mime_type: &str,
        ) -> Result<(), crate::adapters::IndexerError> {
            tokio::time::sleep(self.delay).await;
            self.completed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_drain_waits_for_indexing() {
        let completed = Arc::new(AtomicUsize::new(0));
        let executor = QueryExecutor::builder()
            .catalog(Arc::new(SqliteCatalog::in_memory().unwrap()))
            .indexer(Arc::new(SlowIndexer {
                delay: std::time::Duration::from_millis(200),
                completed: Arc::clone(&completed),
            }))
            .build()
            .unwrap();

        executor
            .query_songs(&SongQuery::new(), &PlatformInfo::legacy("/sdcard"))
            .await
            .unwrap();
        assert_eq!(completed.load(Ordering::SeqCst), 0);
        assert_eq!(executor.pending_scans(), 1);

        executor.drain().await;
        assert_eq!(completed.load(Ordering::SeqCst), 1);
        assert_eq!(executor.pending_scans(), 0);

        // Nothing left to wait for
        executor.drain().await;
    }
}
