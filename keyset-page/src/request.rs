//! Per-call pagination options.

use thiserror::Error;

use crate::pagination::IntoCursorToken;
use crate::query::{IndexHint, Predicate};

/// A pagination request.
///
/// ```
/// use keyset_page::{CompareOp, PaginateRequest, compare};
///
/// let request = PaginateRequest::new(20)
///     .filter(compare("published", CompareOp::Eq, true))
///     .paginate_by("created_at")
///     .desc(true)
///     .after(None::<&str>);
///
/// assert_eq!(request.limit, 20);
/// assert!(request.after.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[non_exhaustive]
pub struct PaginateRequest {
    /// Caller filter, ANDed with the position predicate.
    pub filter: Option<Predicate>,
    /// Fields to project. Empty means all fields.
    pub attributes: Vec<String>,
    /// Relations to include, passed through to the source.
    pub include: Vec<String>,
    /// Page size. Must be positive.
    pub limit: usize,
    /// Fetch the page before this cursor.
    pub before: Option<String>,
    /// Fetch the page after this cursor.
    pub after: Option<String>,
    /// Display order is descending on the pagination field.
    pub desc: bool,
    /// Field to paginate on. Defaults to the primary key.
    pub pagination_field: Option<String>,
    /// Also return the total filtered count.
    pub row_count: bool,
    /// Storage-specific index hints.
    pub index_hints: Vec<IndexHint>,
}

impl PaginateRequest {
    /// Create a request for pages of `limit` rows.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Set the caller filter.
    #[must_use]
    pub fn filter(mut self, filter: Predicate) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the projected fields.
    #[must_use]
    pub fn attributes(mut self, fields: &[&str]) -> Self {
        self.attributes = fields.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Set the relations to include.
    #[must_use]
    pub fn include(mut self, relations: &[&str]) -> Self {
        self.include = relations.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Page backward from this cursor.
    ///
    /// Accepts `&str`, `String` or `Option<_>`; absent or empty tokens
    /// clear the cursor.
    #[must_use]
    pub fn before(mut self, cursor: impl IntoCursorToken) -> Self {
        self.before = cursor.into_cursor_token();
        self
    }

    /// Page forward from this cursor.
    ///
    /// Accepts `&str`, `String` or `Option<_>`; absent or empty tokens
    /// clear the cursor.
    #[must_use]
    pub fn after(mut self, cursor: impl IntoCursorToken) -> Self {
        self.after = cursor.into_cursor_token();
        self
    }

    /// Set descending display order.
    #[must_use]
    pub fn desc(mut self, desc: bool) -> Self {
        self.desc = desc;
        self
    }

    /// Paginate on `field` instead of the primary key.
    #[must_use]
    pub fn paginate_by(mut self, field: impl Into<String>) -> Self {
        self.pagination_field = Some(field.into());
        self
    }

    /// Also return the total filtered count.
    #[must_use]
    pub fn row_count(mut self, row_count: bool) -> Self {
        self.row_count = row_count;
        self
    }

    /// Add an index hint.
    #[must_use]
    pub fn index_hint(mut self, hint: IndexHint) -> Self {
        self.index_hints.push(hint);
        self
    }

    /// Reject malformed requests before any query runs.
    pub fn validate(&self, max_limit: Option<usize>) -> Result<(), RequestError> {
        if self.before.is_some() && self.after.is_some() {
            return Err(RequestError::ConflictingCursors);
        }
        if self.limit == 0 {
            return Err(RequestError::InvalidLimit);
        }
        if let Some(max) = max_limit
            && self.limit > max
        {
            return Err(RequestError::LimitTooLarge {
                limit: self.limit,
                max,
            });
        }
        if self.pagination_field.as_deref() == Some("") {
            return Err(RequestError::EmptyField);
        }
        Ok(())
    }
}

/// Malformed pagination request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RequestError {
    /// Both `before` and `after` were supplied.
    #[error("`before` and `after` cursors are mutually exclusive")]
    ConflictingCursors,
    /// `limit` was zero.
    #[error("limit must be a positive integer")]
    InvalidLimit,
    /// `limit` exceeds the configured maximum.
    #[error("limit {limit} exceeds maximum of {max}")]
    LimitTooLarge {
        /// Requested limit.
        limit: usize,
        /// Allowed maximum.
        max: usize,
    },
    /// The pagination field name was empty.
    #[error("pagination field name must not be empty")]
    EmptyField,
}
