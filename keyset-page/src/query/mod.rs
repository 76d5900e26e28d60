//! Query interface between the paginator and a backing store.

mod source;
mod types;

// Re-export all public items
pub use source::{Fetched, Query, QuerySource, Record};
pub use types::{
    CompareOp, IndexHint, IndexHintKind, Predicate, SortDir, SortField, and, compare, is_in, not,
    or,
};
