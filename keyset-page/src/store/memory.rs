//! In-memory [`QuerySource`].

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::convert::Infallible;

use async_trait::async_trait;
use tracing::debug;

use crate::query::{CompareOp, Fetched, Predicate, Query, QuerySource, Record, SortDir, SortField};
use crate::value::Value;

/// A row: field name to value.
pub type Row = BTreeMap<String, Value>;

/// A [`QuerySource`] over rows held in memory.
///
/// Filters, orders, limits and counts the way a database would, using
/// [`Value::total_cmp`] for ordering. Comparisons against a missing or null
/// field are false, except `Eq`/`Ne` with a null value, which test for
/// null-ness.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Vec<Row>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Create a store from rows given as `(field, value)` pairs.
    pub fn from_rows<I, R, K>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|(k, v)| (k.into(), v)).collect())
                .collect(),
        }
    }

    /// Append a row.
    pub fn insert(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Number of stored rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Run a query synchronously.
    pub fn query(&self, query: &Query) -> Fetched<Row> {
        if !query.include.is_empty() {
            debug!(include = ?query.include, "memory store has no relations, ignoring includes");
        }
        if !query.index_hints.is_empty() {
            debug!(hints = query.index_hints.len(), "memory store has no indexes, ignoring hints");
        }

        let mut matched: Vec<&Row> = self
            .rows
            .iter()
            .filter(|row| query.filter.as_ref().is_none_or(|f| matches(*row, f)))
            .collect();
        let count = matched.len() as u64;

        matched.sort_by(|a, b| compare_rows(*a, *b, &query.order));
        let rows = matched
            .into_iter()
            .take(query.limit)
            .map(|row| project(row, &query.attributes))
            .collect();

        if query.count {
            Fetched::counted(rows, count)
        } else {
            Fetched::rows(rows)
        }
    }
}

impl<K: Into<String>> FromIterator<Vec<(K, Value)>> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = Vec<(K, Value)>>>(iter: I) -> Self {
        Self::from_rows(iter)
    }
}

#[async_trait]
impl QuerySource for MemoryStore {
    type Record = Row;
    type Error = Infallible;

    async fn fetch(&self, query: Query) -> Result<Fetched<Row>, Infallible> {
        Ok(self.query(&query))
    }
}

/// Evaluate a predicate against a record.
pub fn matches<R: Record + ?Sized>(record: &R, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::Compare { field, op, value } => {
            let actual = record.get(field).unwrap_or(Value::Null);
            compare_values(&actual, *op, value)
        },
        Predicate::In { field, values } => match record.get(field) {
            Some(actual) if !actual.is_null() => values
                .iter()
                .any(|v| actual.total_cmp(v) == Ordering::Equal),
            _ => false,
        },
        Predicate::And(items) => items.iter().all(|p| matches(record, p)),
        Predicate::Or(items) => items.iter().any(|p| matches(record, p)),
        Predicate::Not(inner) => !matches(record, inner),
    }
}

fn compare_values(actual: &Value, op: CompareOp, expected: &Value) -> bool {
    match (op, expected) {
        (CompareOp::Eq, Value::Null) => return actual.is_null(),
        (CompareOp::Ne, Value::Null) => return !actual.is_null(),
        _ => {},
    }
    if actual.is_null() || expected.is_null() {
        return false;
    }

    let ord = actual.total_cmp(expected);
    match op {
        CompareOp::Eq => ord == Ordering::Equal,
        CompareOp::Ne => ord != Ordering::Equal,
        CompareOp::Gt => ord == Ordering::Greater,
        CompareOp::Gte => ord != Ordering::Less,
        CompareOp::Lt => ord == Ordering::Less,
        CompareOp::Lte => ord != Ordering::Greater,
    }
}

fn compare_rows(a: &Row, b: &Row, order: &[SortField]) -> Ordering {
    for sort in order {
        let av = a.get(&sort.field).unwrap_or(&Value::Null);
        let bv = b.get(&sort.field).unwrap_or(&Value::Null);
        let ord = match sort.dir {
            SortDir::Asc => av.total_cmp(bv),
            SortDir::Desc => bv.total_cmp(av),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn project(row: &Row, attributes: &[String]) -> Row {
    if attributes.is_empty() {
        return row.clone();
    }
    attributes
        .iter()
        .filter_map(|a| row.get(a).map(|v| (a.clone(), v.clone())))
        .collect()
}
