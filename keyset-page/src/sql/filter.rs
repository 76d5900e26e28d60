//! Predicate lowering into parameterized SQL conditions.

use super::dialect::Dialect;
use crate::query::{CompareOp, Predicate};
use crate::value::Value;

/// Lower a predicate, numbering parameters from `start_idx`.
///
/// Returns the condition, its parameters, and the next free index.
pub(super) fn build_predicate<D: Dialect>(
    dialect: &D,
    predicate: &Predicate,
    start_idx: usize,
) -> (String, Vec<Value>, usize) {
    match predicate {
        Predicate::Compare { field, op, value } => {
            build_compare(dialect, field, *op, value, start_idx)
        },
        Predicate::In { field, values } => {
            if values.is_empty() {
                return ("1 = 0".to_string(), vec![], start_idx);
            }
            let sql = dialect.in_clause(field, values.len(), start_idx);
            (sql, values.clone(), start_idx + values.len())
        },
        Predicate::And(items) => build_compound(dialect, items, " AND ", "1 = 1", start_idx),
        Predicate::Or(items) => build_compound(dialect, items, " OR ", "1 = 0", start_idx),
        Predicate::Not(inner) => {
            let (inner, params, idx) = build_predicate(dialect, inner, start_idx);
            (format!("NOT ({inner})"), params, idx)
        },
    }
}

fn build_compare<D: Dialect>(
    dialect: &D,
    field: &str,
    op: CompareOp,
    value: &Value,
    idx: usize,
) -> (String, Vec<Value>, usize) {
    match (op, value) {
        (CompareOp::Eq, Value::Null) => (format!("{field} IS NULL"), vec![], idx),
        (CompareOp::Ne, Value::Null) => (format!("{field} IS NOT NULL"), vec![], idx),
        // Ordering against NULL never matches
        (_, Value::Null) => ("1 = 0".to_string(), vec![], idx),
        (op, value) => {
            let sql = format!("{} {} {}", field, op.as_sql(), dialect.param(idx));
            (sql, vec![value.clone()], idx + 1)
        },
    }
}

fn build_compound<D: Dialect>(
    dialect: &D,
    items: &[Predicate],
    joiner: &str,
    empty: &str,
    start_idx: usize,
) -> (String, Vec<Value>, usize) {
    let mut idx = start_idx;
    let mut all_params = Vec::new();
    let mut conditions = Vec::with_capacity(items.len());

    for item in items {
        let (condition, params, new_idx) = build_predicate(dialect, item, idx);
        conditions.push(condition);
        all_params.extend(params);
        idx = new_idx;
    }

    let sql = match conditions.len() {
        0 => empty.to_string(),
        1 => conditions.swap_remove(0),
        _ => format!("({})", conditions.join(joiner)),
    };

    (sql, all_params, idx)
}
