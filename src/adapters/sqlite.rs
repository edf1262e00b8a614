//! SQLite-backed media catalog.
//!
//! All songs live in one `audio` table tagged with the volume they were
//! indexed from. Endpoints map onto that table as volume predicates:
//!
//! | Endpoint         | Rows                                 |
//! |------------------|--------------------------------------|
//! | `Volume(name)`   | `volume_name = name`                 |
//! | `Internal`       | `volume_name = 'internal'`           |
//! | `External`       | every volume except `internal`       |
//! | `Fixed(n)`       | volume configured for `n`, if any    |

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use tracing::debug;

use crate::core::{Selection, SortClause};
use crate::domain::columns::{self, SONG_PROJECTION};
use crate::domain::endpoint::INTERNAL_VOLUME;
use crate::domain::{volume_content_uri, EndpointRef, SongRecord, Value};

use super::{Catalog, CatalogError, RowSet};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS audio (
        _id INTEGER PRIMARY KEY AUTOINCREMENT,
        volume_name TEXT NOT NULL,
        _data TEXT NOT NULL,
        _display_name TEXT,
        _size INTEGER,
        album TEXT,
        album_id INTEGER,
        artist TEXT,
        artist_id INTEGER,
        bookmark INTEGER,
        composer TEXT,
        date_added INTEGER,
        date_modified INTEGER,
        duration INTEGER,
        title TEXT,
        title_key TEXT,
        track INTEGER,
        is_alarm INTEGER NOT NULL DEFAULT 0,
        is_audiobook INTEGER NOT NULL DEFAULT 0,
        is_music INTEGER NOT NULL DEFAULT 0,
        is_notification INTEGER NOT NULL DEFAULT 0,
        is_podcast INTEGER NOT NULL DEFAULT 0,
        is_ringtone INTEGER NOT NULL DEFAULT 0
    );

    CREATE INDEX IF NOT EXISTS idx_audio_volume ON audio(volume_name);
    CREATE INDEX IF NOT EXISTS idx_audio_data ON audio(_data);
";

/// Media catalog stored in a SQLite database
pub struct SqliteCatalog {
    conn: Mutex<Connection>,

    /// Fixed selector number -> volume name
    fixed_volumes: HashMap<u32, String>,
}

impl SqliteCatalog {
    /// Open (or create) a catalog database on disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::from_connection(conn)
    }

    /// Create an in-memory catalog (for testing).
    pub fn in_memory() -> Result<Self, CatalogError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, CatalogError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            fixed_volumes: HashMap::new(),
        })
    }

    /// Map a fixed endpoint number onto a volume
    pub fn with_fixed_volume(mut self, number: u32, volume: impl Into<String>) -> Self {
        self.fixed_volumes.insert(number, volume.into());
        self
    }

    pub fn with_fixed_volumes(mut self, volumes: HashMap<u32, String>) -> Self {
        self.fixed_volumes.extend(volumes);
        self
    }

    /// Store a song under `volume`, returning its row id.
    ///
    /// Only known song columns are written; `title_key` is derived from the
    /// title. An explicit `_id` is kept, otherwise one is assigned.
    pub fn insert_song(&self, volume: &str, song: &SongRecord) -> Result<i64, CatalogError> {
        let mut names = vec!["volume_name".to_string()];
        let mut values = vec![SqlValue::Text(volume.to_string())];

        for column in SONG_PROJECTION {
            if let Some(value) = song.get(column) {
                names.push((*column).to_string());
                values.push(to_sql_value(value));
            }
        }

        if let Some(title) = song.get_str(columns::TITLE) {
            names.push(columns::TITLE_KEY.to_string());
            values.push(SqlValue::Text(title.to_lowercase()));
        }

        let placeholders = vec!["?"; names.len()].join(", ");
        let sql = format!(
            "INSERT INTO audio ({}) VALUES ({})",
            names.join(", "),
            placeholders
        );

        let conn = self.conn.lock().map_err(|_| CatalogError::Poisoned)?;
        conn.execute(&sql, params_from_iter(values))?;
        Ok(conn.last_insert_rowid())
    }

    /// Volume predicate for an endpoint; `None` if the endpoint is unknown
    fn endpoint_predicate(&self, endpoint: &EndpointRef) -> Option<(&'static str, String)> {
        match endpoint {
            EndpointRef::Volume(name) => Some(("volume_name = ?", name.clone())),
            EndpointRef::Internal => Some(("volume_name = ?", INTERNAL_VOLUME.to_string())),
            EndpointRef::External => Some(("volume_name != ?", INTERNAL_VOLUME.to_string())),
            EndpointRef::Fixed(n) => self
                .fixed_volumes
                .get(&n.get())
                .map(|volume| ("volume_name = ?", volume.clone())),
        }
    }
}

impl Catalog for SqliteCatalog {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn content_uri(&self, endpoint: &EndpointRef) -> Option<String> {
        match endpoint {
            EndpointRef::Fixed(n) => self
                .fixed_volumes
                .get(&n.get())
                .map(|volume| volume_content_uri(volume)),
            _ => endpoint.content_uri(),
        }
    }

    fn execute_query(
        &self,
        endpoint: &EndpointRef,
        projection: &[&str],
        selection: Option<&Selection>,
        sort: &SortClause,
    ) -> Result<Option<Box<dyn RowSet>>, CatalogError> {
        let Some((predicate, predicate_arg)) = self.endpoint_predicate(endpoint) else {
            debug!(%endpoint, "No volume mapped for endpoint");
            return Ok(None);
        };

        if let Some(bad) = projection.iter().find(|c| !is_identifier(c)) {
            return Err(CatalogError::Query {
                endpoint: endpoint.to_string(),
                message: format!("invalid column name '{}'", bad),
            });
        }

        let mut where_clause = predicate.to_string();
        let mut args = vec![predicate_arg];
        if let Some(selection) = selection {
            where_clause.push_str(&format!(" AND ({})", selection.clause));
            args.extend(selection.args.iter().cloned());
        }

        let sql = format!(
            "SELECT {} FROM audio WHERE {} ORDER BY {}",
            projection.join(", "),
            where_clause,
            sort.as_sql()
        );

        let conn = self.conn.lock().map_err(|_| CatalogError::Poisoned)?;
        let mut stmt = conn.prepare(&sql)?;
        let column_names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query(params_from_iter(args.iter()))?;
        let mut collected = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(column_names.len());
            for (idx, column) in column_names.iter().enumerate() {
                values.push(from_value_ref(column, row.get_ref(idx)?));
            }
            collected.push(values);
        }

        let row_set: Box<dyn RowSet> = Box::new(SqliteRows {
            column_names,
            rows: collected.into_iter(),
        });
        Ok(Some(row_set))
    }
}

/// Rows read from one endpoint query
struct SqliteRows {
    column_names: Vec<String>,
    rows: std::vec::IntoIter<Vec<Value>>,
}

impl RowSet for SqliteRows {
    fn column_names(&self) -> &[String] {
        &self.column_names
    }

    fn next_row(&mut self) -> Result<Option<Vec<Value>>, CatalogError> {
        Ok(self.rows.next())
    }
}

/// Type a raw SQLite value according to its column
fn from_value_ref(column: &str, value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from_integer(column, i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(_) => Value::Null,
    }
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Float(f) => SqlValue::Real(*f),
        Value::Text(s) => SqlValue::Text(s.clone()),
    }
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
