//! Keyset pagination condition generation.

use thiserror::Error;

use crate::query::{CompareOp, Predicate, Record, SortDir, SortField, compare};
use crate::value::Value;

use super::cursor::{CursorError, Position};

/// The total order pages are cut from: a pagination field, tie-broken by the
/// primary key when the pagination field is not itself the primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyset {
    field: String,
    primary_key: String,
}

impl Keyset {
    /// Create a keyset over `field`, tie-broken by `primary_key`.
    pub fn new(field: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            primary_key: primary_key.into(),
        }
    }

    /// The pagination field.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The primary key field.
    #[must_use]
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Whether positions need the primary key as a tie-break.
    #[inline]
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.field != self.primary_key
    }

    /// Number of values in a position on this keyset.
    #[inline]
    #[must_use]
    pub fn arity(&self) -> usize {
        if self.is_composite() { 2 } else { 1 }
    }

    /// Check that a decoded position fits this keyset.
    pub fn check(&self, position: &Position) -> Result<(), CursorError> {
        if position.arity() == self.arity() {
            Ok(())
        } else {
            Err(CursorError::ArityMismatch {
                expected: self.arity(),
                found: position.arity(),
            })
        }
    }

    /// Read a record's position.
    pub fn position_of<R: Record + ?Sized>(&self, record: &R) -> Result<Position, BoundaryError> {
        let value = record
            .get(&self.field)
            .ok_or_else(|| BoundaryError::missing(&self.field))?;

        if !self.is_composite() {
            return Ok(Position::Single(value));
        }

        let pk = record
            .get(&self.primary_key)
            .ok_or_else(|| BoundaryError::missing(&self.primary_key))?;
        Ok(Position::Composite(value, pk))
    }

    /// A record's position, encoded as a cursor token.
    pub fn cursor_of<R: Record + ?Sized>(&self, record: &R) -> Result<String, BoundaryError> {
        self.position_of(record)?.encode().map_err(BoundaryError::from)
    }

    /// Ordering for a traversal in `dir`.
    ///
    /// The primary key tie-break follows the same direction as the pagination
    /// field so that it agrees with the seek predicate.
    #[must_use]
    pub fn order(&self, dir: SortDir) -> Vec<SortField> {
        let mut order = vec![SortField::new(self.field.clone(), dir)];
        if self.is_composite() {
            order.push(SortField::new(self.primary_key.clone(), dir));
        }
        order
    }
}

/// A returned record cannot mark a page boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BoundaryError {
    /// The record lacks the pagination or primary key field.
    #[error("record is missing keyset field '{field}'")]
    MissingField {
        /// The absent field.
        field: String,
    },
    /// The record's position has no cursor form.
    #[error("record position cannot be encoded: {0}")]
    Unencodable(#[from] CursorError),
}

impl BoundaryError {
    fn missing(field: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
        }
    }
}

/// Keyset pagination condition.
///
/// Selects the records strictly beyond a position when walking the keyset in
/// a given direction.
#[derive(Debug, Clone)]
pub struct KeysetCondition {
    keyset: Keyset,
    position: Position,
    op: CompareOp,
}

impl KeysetCondition {
    /// Create a condition seeking past `position` while traversing in `dir`.
    ///
    /// Fails if the position's arity does not fit the keyset.
    pub fn new(keyset: &Keyset, position: Position, dir: SortDir) -> Result<Self, CursorError> {
        keyset.check(&position)?;
        let op = match dir {
            SortDir::Asc => CompareOp::Gt,
            SortDir::Desc => CompareOp::Lt,
        };
        Ok(Self {
            keyset: keyset.clone(),
            position,
            op,
        })
    }

    /// The seek operator (`>` or `<`).
    #[must_use]
    pub const fn op(&self) -> CompareOp {
        self.op
    }

    /// Convert to a predicate.
    ///
    /// For a unique pagination field: `field <op> v`
    ///
    /// Otherwise the primary key breaks ties:
    /// `(field <op> v) OR (field = v AND pk <op> pk_v)`
    ///
    /// NULL sorts below every value. Walking down (`<`) from a non-null `v`
    /// also takes `field IS NULL`; a NULL `v` seeks with `IS NULL` /
    /// `IS NOT NULL` instead of an ordered comparison.
    #[must_use]
    pub fn to_predicate(&self) -> Predicate {
        let field = self.keyset.field.as_str();
        let pk_field = self.keyset.primary_key.as_str();
        let ascending = self.op == CompareOp::Gt;
        let value = self.position.field_value();
        let tie_break = |v: &Value| {
            self.position.key_value().map(|pk| {
                Predicate::And(vec![
                    compare(field, CompareOp::Eq, v.clone()),
                    compare(pk_field, self.op, pk.clone()),
                ])
            })
        };

        let mut branches = Vec::with_capacity(3);
        if value.is_null() {
            if ascending {
                branches.push(compare(field, CompareOp::Ne, Value::Null));
            }
            branches.extend(tie_break(&Value::Null));
        } else {
            branches.push(compare(field, self.op, value.clone()));
            if let Some(tie) = tie_break(value) {
                branches.push(tie);
                if !ascending {
                    branches.push(compare(field, CompareOp::Eq, Value::Null));
                }
            }
        }

        match <[Predicate; 1]>::try_from(branches) {
            Ok([only]) => only,
            Err(branches) => Predicate::Or(branches),
        }
    }
}
