// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Code items in docs
#![allow(clippy::missing_errors_doc)] // # Errors sections - doc-heavy
#![allow(clippy::missing_panics_doc)] // # Panics sections - doc-heavy
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable
#![allow(clippy::return_self_not_must_use)] // Builder pattern methods return Self
#![allow(clippy::must_use_candidate)] // Builder methods - fluent API doesn't need must_use
#![allow(clippy::format_push_string)] // String building style preference
#![allow(clippy::exhaustive_enums)] // Closed sets: sort direction, operators, positions
#![allow(clippy::exhaustive_structs)] // Plain data carriers built with struct literals
#![allow(clippy::double_must_use)] // Functions returning must_use types can have their own docs

//! # keyset-page - Cursor Pagination over Any Query Source
//!
//! Stable, bidirectional keyset pagination. A page is cut from the total
//! order `(pagination field, primary key)` and addressed by opaque cursor
//! tokens; no OFFSET scans, no skipped or repeated rows when pages are
//! walked in either direction.
//!
//! ## Quick Start
//!
//! ```
//! # use keyset_page::prelude::*;
//! # futures::executor::block_on(async {
//! let store = MemoryStore::from_rows((1..=5i64).map(|i| vec![("id", Value::Int(i))]));
//! let paginator = Paginator::new(store);
//!
//! let first = paginator.paginate(&PaginateRequest::new(2)).await.unwrap();
//! assert_eq!(first.results.len(), 2);
//! assert!(first.has_next());
//! assert!(!first.has_previous());
//!
//! let next = PaginateRequest::new(2).after(first.after());
//! let second = paginator.paginate(&next).await.unwrap();
//! assert!(second.has_previous());
//!
//! // And back again
//! let back = PaginateRequest::new(2).before(second.before());
//! let again = paginator.paginate(&back).await.unwrap();
//! assert_eq!(again.results, first.results);
//! # });
//! ```
//!
//! ## Plugging in a Store
//!
//! The paginator issues one [`Query`] per page through [`QuerySource`].
//! Adapters lower its [`Predicate`] tree and ordering into their native
//! query. [`MemoryStore`] evaluates queries in memory; the [`sql`] module
//! renders them as parameterized Postgres or `SQLite` statements.
//!
//! ## Cursor Format
//!
//! A cursor is URL-safe base64 (no padding) of a JSON array holding the
//! boundary row's pagination field value, followed by its primary key when
//! the pagination field is not the primary key: `[10,2]`. Cursors are an
//! encoding, not a secret; do not put sensitive values in sort fields. NaN
//! and infinite floats have no JSON form, so rows holding them in a keyset
//! field cannot mark a page boundary.
//!
//! NULL pagination values sort below every other value.

mod config;
mod engine;
mod error;
mod pagination;
mod query;
mod request;
pub mod sql;
mod store;
mod value;

pub use config::{ConfigError, DEFAULT_NAME, DEFAULT_PRIMARY_KEY, PaginatorConfig};
pub use engine::{Anchor, PagePlan, PageWindow, Paginator, PlanError};
pub use error::PaginateError;
pub use pagination::{
    BoundaryError, CursorError, IntoCursorToken, Keyset, KeysetCondition, MAX_CURSOR_SIZE, Page,
    PageInfo, Position, decode_cursor,
};
pub use query::{
    CompareOp, Fetched, IndexHint, IndexHintKind, Predicate, Query, QuerySource, Record, SortDir,
    SortField, and, compare, is_in, not, or,
};
pub use request::{PaginateRequest, RequestError};
pub use store::{MemoryStore, Row, matches};
pub use value::Value;

/// Prelude module for convenient imports.
///
/// ```
/// use keyset_page::prelude::*;
///
/// let request = PaginateRequest::new(10).filter(compare("active", CompareOp::Eq, true));
/// assert_eq!(request.limit, 10);
/// ```
pub mod prelude {
    pub use crate::{
        CompareOp, CursorError, IndexHint, IndexHintKind, MemoryStore, Page, PageInfo,
        PaginateError, PaginateRequest, Paginator, PaginatorConfig, Position, Predicate, Query,
        QuerySource, Record, SortDir, SortField, Value, and, compare, is_in, not, or,
    };
}

// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================

#[cfg(test)]
mod api_contracts {
    use std::convert::Infallible;

    use static_assertions::assert_impl_all;

    // ========================================================================
    // Cursor and page types
    // ========================================================================

    assert_impl_all!(crate::Position: Clone, std::fmt::Debug, PartialEq);
    assert_impl_all!(crate::PageInfo: Clone, std::fmt::Debug, PartialEq, Eq, Default);
    assert_impl_all!(crate::Page<crate::Row>: Clone, std::fmt::Debug, PartialEq, Send, Sync);

    // Value is Clone, Debug, PartialEq (no Eq because of Float)
    assert_impl_all!(crate::Value: Clone, std::fmt::Debug, PartialEq, Send, Sync);

    // ========================================================================
    // Enum types
    // ========================================================================

    assert_impl_all!(crate::CompareOp: Copy, Clone, std::fmt::Debug, PartialEq, Eq);
    assert_impl_all!(crate::SortDir: Copy, Clone, std::fmt::Debug, PartialEq, Eq);
    assert_impl_all!(crate::Anchor: Copy, Clone, std::fmt::Debug, PartialEq, Eq);

    // ========================================================================
    // Engine and errors
    // ========================================================================

    // One paginator serves concurrent calls
    assert_impl_all!(crate::Paginator<crate::MemoryStore>: Send, Sync);
    assert_impl_all!(crate::CursorError: std::error::Error, Clone, PartialEq, Send, Sync);
    assert_impl_all!(crate::RequestError: std::error::Error, Clone, PartialEq, Send, Sync);
    assert_impl_all!(crate::BoundaryError: std::error::Error, Clone, PartialEq, Send, Sync);
    assert_impl_all!(crate::PaginateError<Infallible>: std::error::Error, Send, Sync);
    assert_impl_all!(crate::sql::SqlError: std::error::Error, Clone, PartialEq, Send, Sync);
}
