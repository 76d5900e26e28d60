//! Lowering of [`Query`](crate::Query) values into parameterized SQL.
//!
//! | Dialect | Placeholders | Index hints |
//! |---------|--------------|-------------|
//! | [`Postgres`] | `$1, $2, ...` | ignored |
//! | [`Sqlite`] | `?1, ?2, ...` | `INDEXED BY` / `NOT INDEXED` |
//!
//! Identifiers (table, fields, indexes) are validated before rendering;
//! values are always passed as parameters.

mod dialect;
mod filter;
mod identifier;
mod select;

use thiserror::Error;

pub use dialect::{Dialect, Postgres, Sqlite};
pub use identifier::{is_valid_sql_identifier, validate_identifier};
pub use select::{QueryResult, count, select};

/// SQL rendering failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SqlError {
    /// An identifier would not be safe to splice into SQL.
    #[error(
        "invalid SQL {context} name '{name}': must start with letter/underscore, \
         contain only ASCII alphanumeric/underscore, and be 1-63 chars"
    )]
    InvalidIdentifier {
        /// Role of the identifier (`table`, `field`, ...).
        context: &'static str,
        /// The rejected name.
        name: String,
    },
}
