//! SQL dialect implementations for Postgres and `SQLite`.
//!
//! Each dialect handles the specific syntax differences between databases.

use tracing::debug;

use crate::query::{IndexHint, IndexHintKind, SortDir};

/// SQL dialect trait for database-specific syntax.
pub trait Dialect: Clone + Copy {
    /// Format a parameter placeholder (e.g., `$1` for Postgres, `?1` for `SQLite`).
    fn param(&self, idx: usize) -> String;

    /// Format an IN clause over `count` parameters starting at `start_idx`.
    fn in_clause(&self, field: &str, count: usize, start_idx: usize) -> String {
        let placeholders: Vec<String> = (0..count).map(|i| self.param(start_idx + i)).collect();
        format!("{} IN ({})", field, placeholders.join(", "))
    }

    /// One `ORDER BY` term. NULL must sort below every value.
    fn order_term(&self, field: &str, dir: SortDir) -> String {
        format!("{field} {}", dir.as_sql())
    }

    /// Table suffix expressing index hints, if the dialect has one.
    fn index_clause(&self, hints: &[IndexHint]) -> Option<String>;
}

/// Postgres dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("${idx}")
    }

    /// Postgres sorts NULL above every value unless told otherwise.
    fn order_term(&self, field: &str, dir: SortDir) -> String {
        match dir {
            SortDir::Asc => format!("{field} ASC NULLS FIRST"),
            SortDir::Desc => format!("{field} DESC NULLS LAST"),
        }
    }

    fn index_clause(&self, hints: &[IndexHint]) -> Option<String> {
        if !hints.is_empty() {
            debug!(hints = hints.len(), "postgres has no index hints, ignoring");
        }
        None
    }
}

/// `SQLite` dialect.
///
/// `SQLite` already sorts NULL below every value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Dialect for Sqlite {
    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("?{idx}")
    }

    /// `USE` and `FORCE` map to `INDEXED BY`, `IGNORE` to `NOT INDEXED`.
    /// `SQLite` takes a single index, so only the first one named is used.
    fn index_clause(&self, hints: &[IndexHint]) -> Option<String> {
        let (first, rest) = hints.split_first()?;
        if !rest.is_empty() || first.values.len() > 1 {
            debug!("sqlite takes one index hint, ignoring the rest");
        }
        match first.kind {
            IndexHintKind::Use | IndexHintKind::Force => first
                .values
                .first()
                .map(|index| format!("INDEXED BY {index}")),
            IndexHintKind::Ignore => Some("NOT INDEXED".to_string()),
        }
    }
}
