//! Song query requests.
//!
//! [`RawSongQuery`] mirrors the loosely typed arguments the bridge layer
//! receives; [`SongQuery`] is the validated form the core works with.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::columns;
use super::endpoint::ScopeSelector;

/// Errors raised while decoding a request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Invalid argument '{argument}': {value} is not a known value")]
    InvalidArgument { argument: &'static str, value: i64 },
}

/// Field a song query can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SongSortField {
    Title,
    Artist,
    Album,
    Duration,
    DateAdded,
    Size,
    DisplayName,
}

impl SongSortField {
    /// Native catalog column backing this field
    pub fn column(&self) -> &'static str {
        match self {
            SongSortField::Title => columns::TITLE,
            SongSortField::Artist => columns::ARTIST,
            SongSortField::Album => columns::ALBUM,
            SongSortField::Duration => columns::DURATION,
            SongSortField::DateAdded => columns::DATE_ADDED,
            SongSortField::Size => columns::SIZE,
            SongSortField::DisplayName => columns::DISPLAY_NAME,
        }
    }

    /// Whether the column holds text (and so can be compared case-insensitively)
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            SongSortField::Title
                | SongSortField::Artist
                | SongSortField::Album
                | SongSortField::DisplayName
        )
    }
}

impl TryFrom<i64> for SongSortField {
    type Error = RequestError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(SongSortField::Title),
            1 => Ok(SongSortField::Artist),
            2 => Ok(SongSortField::Album),
            3 => Ok(SongSortField::Duration),
            4 => Ok(SongSortField::DateAdded),
            5 => Ok(SongSortField::Size),
            6 => Ok(SongSortField::DisplayName),
            _ => Err(RequestError::InvalidArgument {
                argument: "sortType",
                value: raw,
            }),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

impl TryFrom<i64> for SortOrder {
    type Error = RequestError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(SortOrder::Ascending),
            1 => Ok(SortOrder::Descending),
            _ => Err(RequestError::InvalidArgument {
                argument: "orderType",
                value: raw,
            }),
        }
    }
}

/// A validated song query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongQuery {
    /// Field to sort by; `None` uses the catalog's default ordering
    pub sort_field: Option<SongSortField>,

    pub sort_order: SortOrder,

    /// Compare textual sort fields case-insensitively
    pub ignore_case: bool,

    /// Only keep songs whose path contains this folder
    pub path_filter: Option<String>,

    pub scope: ScopeSelector,
}

impl SongQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sorted_by(mut self, field: SongSortField, order: SortOrder) -> Self {
        self.sort_field = Some(field);
        self.sort_order = order;
        self
    }

    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn with_path_filter(mut self, path: impl Into<String>) -> Self {
        self.path_filter = Some(path.into());
        self
    }

    pub fn with_scope(mut self, scope: ScopeSelector) -> Self {
        self.scope = scope;
        self
    }
}

/// Request arguments as delivered by the bridge layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSongQuery {
    #[serde(default)]
    pub sort_type: Option<i64>,
    #[serde(default)]
    pub order_type: i64,
    #[serde(default)]
    pub ignore_case: bool,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub uri: i64,
}

impl TryFrom<RawSongQuery> for SongQuery {
    type Error = RequestError;

    fn try_from(raw: RawSongQuery) -> Result<Self, Self::Error> {
        let scope = u32::try_from(raw.uri).map_err(|_| RequestError::InvalidArgument {
            argument: "uri",
            value: raw.uri,
        })?;

        Ok(SongQuery {
            sort_field: raw.sort_type.map(SongSortField::try_from).transpose()?,
            sort_order: SortOrder::try_from(raw.order_type)?,
            ignore_case: raw.ignore_case,
            path_filter: raw.path,
            scope: ScopeSelector::from_raw(scope),
        })
    }
}
