//! Store-neutral filter and ordering types.
//!
//! Query adapters lower these into their store's native representation
//! (see [`crate::sql`] and [`crate::MemoryStore`]).

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    /// Equal: `=`
    Eq,
    /// Not equal: `!=`
    Ne,
    /// Greater than: `>`
    Gt,
    /// Greater than or equal: `>=`
    Gte,
    /// Less than: `<`
    Lt,
    /// Less than or equal: `<=`
    Lte,
}

impl CompareOp {
    /// SQL spelling of the operator.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }
}

/// A filter predicate.
///
/// Replaces operator-keyed filter objects with an explicit tree that each
/// store adapter lowers on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `field <op> value`
    Compare {
        /// Field name.
        field: String,
        /// Comparison operator.
        op: CompareOp,
        /// Right-hand side.
        value: Value,
    },
    /// `field IN (values...)`
    In {
        /// Field name.
        field: String,
        /// Candidate values. Empty matches nothing.
        values: Vec<Value>,
    },
    /// All conditions must match. Empty matches everything.
    And(Vec<Predicate>),
    /// At least one condition must match. Empty matches nothing.
    Or(Vec<Predicate>),
    /// Negate the condition.
    Not(Box<Predicate>),
}

impl Predicate {
    /// Combine an optional base filter with an optional extra condition.
    ///
    /// Both present yields `And([extra, base])`: the position predicate
    /// comes ahead of the caller's filter.
    #[must_use]
    pub fn conjoin(base: Option<Self>, extra: Option<Self>) -> Option<Self> {
        match (base, extra) {
            (Some(base), Some(extra)) => Some(Self::And(vec![extra, base])),
            (base, None) => base,
            (None, extra) => extra,
        }
    }

    /// Visit every field name referenced by this predicate.
    pub fn for_each_field<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            Self::Compare { field, .. } | Self::In { field, .. } => f(field),
            Self::And(items) | Self::Or(items) => {
                for item in items {
                    item.for_each_field(f);
                }
            },
            Self::Not(inner) => inner.for_each_field(f),
        }
    }
}

/// Helper function to create a comparison predicate.
pub fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Predicate {
    Predicate::Compare {
        field: field.into(),
        op,
        value: value.into(),
    }
}

/// Helper function to create an `IN` predicate.
pub fn is_in<V: Into<Value>>(
    field: impl Into<String>,
    values: impl IntoIterator<Item = V>,
) -> Predicate {
    Predicate::In {
        field: field.into(),
        values: values.into_iter().map(Into::into).collect(),
    }
}

/// Helper function to create an AND predicate.
#[must_use]
pub const fn and(filters: Vec<Predicate>) -> Predicate {
    Predicate::And(filters)
}

/// Helper function to create an OR predicate.
#[must_use]
pub const fn or(filters: Vec<Predicate>) -> Predicate {
    Predicate::Or(filters)
}

/// Helper function to create a NOT predicate.
#[must_use]
pub fn not(filter: Predicate) -> Predicate {
    Predicate::Not(Box::new(filter))
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDir {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl SortDir {
    /// `Desc` when `desc` is set, `Asc` otherwise.
    #[inline]
    #[must_use]
    pub const fn from_desc(desc: bool) -> Self {
        if desc { Self::Desc } else { Self::Asc }
    }

    /// SQL keyword for this direction.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Sort field with direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    /// Field to sort by.
    pub field: String,
    /// Sort direction.
    pub dir: SortDir,
}

impl SortField {
    /// Create a new sort field.
    pub fn new(field: impl Into<String>, dir: SortDir) -> Self {
        Self {
            field: field.into(),
            dir,
        }
    }
}

/// How an index hint should be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndexHintKind {
    /// Prefer the named indexes.
    Use,
    /// Require the named indexes.
    Force,
    /// Avoid the named indexes.
    Ignore,
}

/// A storage-specific index hint, passed through to the query adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexHint {
    /// How the hint applies.
    #[serde(rename = "type")]
    pub kind: IndexHintKind,
    /// Index names, most preferred first.
    pub values: Vec<String>,
}

impl IndexHint {
    /// Create a hint for the given indexes.
    pub fn new<S: Into<String>>(kind: IndexHintKind, values: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind,
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}
