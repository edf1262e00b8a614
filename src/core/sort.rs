//! ORDER BY construction for song queries.

use std::fmt;

use crate::domain::columns::TITLE_KEY;
use crate::domain::{SongSortField, SortOrder};

/// Ordering used when the caller does not pick a sort field
pub const DEFAULT_SORT_ORDER: &str = TITLE_KEY;

/// A concrete ORDER BY expression (without the `ORDER BY` keyword)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortClause(String);

impl SortClause {
    /// Build the clause for a sort request.
    ///
    /// Case folding is only applied to textual columns; numeric fields
    /// ignore `ignore_case`.
    pub fn build(field: Option<SongSortField>, order: SortOrder, ignore_case: bool) -> Self {
        let Some(field) = field else {
            return Self::catalog_default();
        };

        let collate = if ignore_case && field.is_textual() {
            " COLLATE NOCASE"
        } else {
            ""
        };

        Self(format!("{}{} {}", field.column(), collate, order.keyword()))
    }

    pub fn catalog_default() -> Self {
        Self(DEFAULT_SORT_ORDER.to_string())
    }

    pub fn as_sql(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SortClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_when_field_absent() {
        let clause = SortClause::build(None, SortOrder::Descending, true);
        assert_eq!(clause.as_sql(), "title_key");
    }

    #[test]
    fn test_textual_field_with_case_folding() {
        let clause = SortClause::build(Some(SongSortField::Artist), SortOrder::Ascending, true);
        assert_eq!(clause.as_sql(), "artist COLLATE NOCASE ASC");

        let clause = SortClause::build(Some(SongSortField::Title), SortOrder::Descending, false);
        assert_eq!(clause.as_sql(), "title DESC");
    }

    #[test]
    fn test_numeric_field_ignores_case_folding() {
        let clause = SortClause::build(Some(SongSortField::Duration), SortOrder::Descending, true);
        assert_eq!(clause.as_sql(), "duration DESC");

        let clause = SortClause::build(Some(SongSortField::Size), SortOrder::Ascending, true);
        assert_eq!(clause.as_sql(), "_size ASC");
    }
}
