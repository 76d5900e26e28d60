//! The query interface consumed by the paginator.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::types::{IndexHint, Predicate, SortField};
use crate::value::Value;

/// A single query handed to a [`QuerySource`].
///
/// Built by the paginator; adapters read it and lower it into their store's
/// native query.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Query {
    /// Row filter. `None` matches every row.
    pub filter: Option<Predicate>,
    /// Fields to project. Empty means all fields.
    pub attributes: Vec<String>,
    /// Relations to include, passed through opaquely.
    pub include: Vec<String>,
    /// Ordering, most significant first.
    pub order: Vec<SortField>,
    /// Maximum rows to return.
    pub limit: usize,
    /// Storage-specific index hints.
    pub index_hints: Vec<IndexHint>,
    /// Whether the total number of filtered rows (ignoring `limit`) is wanted.
    pub count: bool,
}

impl Query {
    /// Create a query returning at most `limit` rows.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self {
            filter: None,
            attributes: Vec::new(),
            include: Vec::new(),
            order: Vec::new(),
            limit,
            index_hints: Vec::new(),
            count: false,
        }
    }

    /// Set the row filter.
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

    /// Append an ordering term.
    #[must_use]
    pub fn order_by(mut self, sort: SortField) -> Self {
        self.order.push(sort);
        self
    }

    /// Request the total count alongside the rows.
    #[must_use]
    pub fn with_count(mut self) -> Self {
        self.count = true;
        self
    }
}

/// Rows returned by a [`QuerySource`].
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Fetched<R> {
    /// Rows in query order.
    pub rows: Vec<R>,
    /// Total filtered row count, when [`Query::count`] was set.
    pub count: Option<u64>,
}

impl<R> Fetched<R> {
    /// Rows without a count.
    #[must_use]
    pub const fn rows(rows: Vec<R>) -> Self {
        Self { rows, count: None }
    }

    /// Rows with a total count.
    #[must_use]
    pub const fn counted(rows: Vec<R>, count: u64) -> Self {
        Self {
            rows,
            count: Some(count),
        }
    }
}

/// A row that exposes scalar field values by name.
///
/// The pagination field and primary key field must be present on every row
/// the source returns.
pub trait Record {
    /// Value of `field`, or `None` if the row has no such field.
    fn get(&self, field: &str) -> Option<Value>;
}

impl Record for BTreeMap<String, Value> {
    fn get(&self, field: &str) -> Option<Value> {
        BTreeMap::get(self, field).cloned()
    }
}

impl Record for serde_json::Map<String, serde_json::Value> {
    fn get(&self, field: &str) -> Option<Value> {
        match serde_json::Map::get(self, field)? {
            serde_json::Value::Null => Some(Value::Null),
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .or_else(|| n.as_f64().map(Value::Float)),
            serde_json::Value::String(s) => Some(Value::String(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }
}

/// A queryable collection.
///
/// The paginator makes exactly one `fetch` call per page and never retries;
/// errors are handed back to the caller unchanged.
#[async_trait]
pub trait QuerySource: Send + Sync {
    /// Row type.
    type Record: Record + Send;
    /// Store-level failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run `query`, returning rows in the requested order and, if
    /// [`Query::count`] is set, the total filtered count.
    async fn fetch(&self, query: Query) -> Result<Fetched<Self::Record>, Self::Error>;
}

#[async_trait]
impl<'a, T: QuerySource + ?Sized> QuerySource for &'a T {
    type Record = T::Record;
    type Error = T::Error;

    async fn fetch(&self, query: Query) -> Result<Fetched<Self::Record>, Self::Error> {
        (**self).fetch(query).await
    }
}

#[async_trait]
impl<T: QuerySource + ?Sized> QuerySource for Arc<T> {
    type Record = T::Record;
    type Error = T::Error;

    async fn fetch(&self, query: Query) -> Result<Fetched<Self::Record>, Self::Error> {
        (**self).fetch(query).await
    }
}
