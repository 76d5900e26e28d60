//! SELECT and COUNT rendering for a [`Query`].

use super::SqlError;
use super::dialect::Dialect;
use super::filter::build_predicate;
use super::identifier::validate_query;
use crate::query::Query;
use crate::value::Value;

/// Rendered SQL with its positional parameters.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "QueryResult must be used to execute the query"]
pub struct QueryResult {
    /// The statement, with dialect placeholders.
    pub sql: String,
    /// Values for the placeholders, in order.
    pub params: Vec<Value>,
}

/// Render the row query.
///
/// Projection, filter, ordering and limit come from the query; relation
/// includes are not expressible in a single-table SELECT and are left to the
/// caller.
///
/// ```
/// use keyset_page::sql::{self, Postgres};
/// use keyset_page::{CompareOp, Query, SortDir, SortField, compare};
///
/// let query = Query::new(11)
///     .filter(compare("score", CompareOp::Gt, 10i64))
///     .order_by(SortField::new("score", SortDir::Asc));
/// let rendered = sql::select(Postgres, "posts", &query).unwrap();
///
/// assert_eq!(
///     rendered.sql,
///     "SELECT * FROM posts WHERE score > $1 ORDER BY score ASC NULLS FIRST LIMIT 11"
/// );
/// ```
pub fn select<D: Dialect>(dialect: D, table: &str, query: &Query) -> Result<QueryResult, SqlError> {
    validate_query(table, query)?;

    let fields = if query.attributes.is_empty() {
        "*".to_string()
    } else {
        query.attributes.join(", ")
    };

    let mut sql = format!("SELECT {fields} FROM {}", from_clause(dialect, table, query));
    let params = push_where(dialect, &mut sql, query);

    if !query.order.is_empty() {
        let sort_parts: Vec<String> = query
            .order
            .iter()
            .map(|s| dialect.order_term(&s.field, s.dir))
            .collect();
        sql.push_str(" ORDER BY ");
        sql.push_str(&sort_parts.join(", "));
    }

    sql.push_str(&format!(" LIMIT {}", query.limit));

    Ok(QueryResult { sql, params })
}

/// Render the count query: the same filter, no ordering or limit.
pub fn count<D: Dialect>(dialect: D, table: &str, query: &Query) -> Result<QueryResult, SqlError> {
    validate_query(table, query)?;

    let mut sql = format!("SELECT COUNT(*) FROM {}", from_clause(dialect, table, query));
    let params = push_where(dialect, &mut sql, query);

    Ok(QueryResult { sql, params })
}

fn from_clause<D: Dialect>(dialect: D, table: &str, query: &Query) -> String {
    match dialect.index_clause(&query.index_hints) {
        Some(hint) => format!("{table} {hint}"),
        None => table.to_string(),
    }
}

fn push_where<D: Dialect>(dialect: D, sql: &mut String, query: &Query) -> Vec<Value> {
    match &query.filter {
        Some(filter) => {
            let (condition, params, _) = build_predicate(&dialect, filter, 1);
            sql.push_str(" WHERE ");
            sql.push_str(&condition);
            params
        },
        None => Vec::new(),
    }
}
