//! Error type returned by [`Paginator::paginate`](crate::Paginator::paginate).

use thiserror::Error;

use crate::pagination::{BoundaryError, CursorError};
use crate::request::RequestError;

/// Pagination failure, generic over the source's own error type `E`.
///
/// Cursor and request errors are raised before any query runs. Source errors
/// pass through untouched in [`PaginateError::Query`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PaginateError<E> {
    /// A `before`/`after` cursor could not be decoded or does not fit the
    /// pagination field.
    #[error("invalid cursor: {0}")]
    Cursor(#[from] CursorError),
    /// The request was malformed.
    #[error("invalid pagination request: {0}")]
    Request(#[from] RequestError),
    /// A returned row cannot mark a page boundary: it lacks the pagination
    /// or primary key field, or holds a value no cursor can carry.
    #[error(transparent)]
    Boundary(#[from] BoundaryError),
    /// The source failed.
    #[error(transparent)]
    Query(E),
}

impl<E> PaginateError<E> {
    /// Returns `true` for faults in the caller's input (cursor or request).
    #[inline]
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Cursor(_) | Self::Request(_))
    }

    /// The source error, if this is one.
    #[must_use]
    pub fn into_query_error(self) -> Option<E> {
        match self {
            Self::Query(e) => Some(e),
            _ => None,
        }
    }
}
