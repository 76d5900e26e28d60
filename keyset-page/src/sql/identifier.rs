//! Identifier validation for SQL injection prevention.

use super::SqlError;
use crate::query::Query;

/// Maximum length for SQL identifiers (`PostgreSQL` limit is 63).
const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Validate that a string is a safe SQL identifier.
///
/// A valid SQL identifier starts with an ASCII letter or underscore, contains
/// only ASCII letters, digits and underscores, and is 1 to 63 characters long.
///
/// # Examples
///
/// ```
/// use keyset_page::sql::is_valid_sql_identifier;
///
/// assert!(is_valid_sql_identifier("users"));
/// assert!(is_valid_sql_identifier("_private"));
///
/// assert!(!is_valid_sql_identifier("123abc"));
/// assert!(!is_valid_sql_identifier("user; DROP"));
/// ```
#[inline]
#[must_use]
pub fn is_valid_sql_identifier(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_IDENTIFIER_LENGTH {
        return false;
    }

    let mut chars = s.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check an identifier, naming its role in the error.
pub fn validate_identifier(s: &str, context: &'static str) -> Result<(), SqlError> {
    if is_valid_sql_identifier(s) {
        Ok(())
    } else {
        Err(SqlError::InvalidIdentifier {
            context,
            name: s.to_string(),
        })
    }
}

/// Check every identifier a query would splice into SQL.
pub(super) fn validate_query(table: &str, query: &Query) -> Result<(), SqlError> {
    validate_identifier(table, "table")?;
    for field in &query.attributes {
        validate_identifier(field, "field")?;
    }
    for sort in &query.order {
        validate_identifier(&sort.field, "sort field")?;
    }
    for hint in &query.index_hints {
        for index in &hint.values {
            validate_identifier(index, "index")?;
        }
    }

    let mut result = Ok(());
    if let Some(filter) = &query.filter {
        filter.for_each_field(&mut |field| {
            if result.is_ok() {
                result = validate_identifier(field, "filter field");
            }
        });
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{CompareOp, SortDir, SortField, compare};

    #[test]
    fn test_valid_sql_identifiers() {
        assert!(is_valid_sql_identifier("users"));
        assert!(is_valid_sql_identifier("user_id"));
        assert!(is_valid_sql_identifier("_"));
        assert!(is_valid_sql_identifier("Table123"));
    }

    #[test]
    fn test_invalid_sql_identifiers() {
        assert!(!is_valid_sql_identifier(""));
        assert!(!is_valid_sql_identifier("1"));
        assert!(!is_valid_sql_identifier("user.id"));
        assert!(!is_valid_sql_identifier("users--"));
        assert!(!is_valid_sql_identifier("usërs"));
        assert!(!is_valid_sql_identifier("(SELECT 1)"));
    }

    #[test]
    fn test_sql_identifier_length_limit() {
        assert!(is_valid_sql_identifier(&"a".repeat(63)));
        assert!(!is_valid_sql_identifier(&"a".repeat(64)));
    }

    #[test]
    fn test_validate_query_reports_first_bad_field() {
        let query = Query::new(10)
            .filter(crate::query::and(vec![
                compare("ok", CompareOp::Eq, 1i64),
                compare("bad field", CompareOp::Eq, 1i64),
                compare("also bad", CompareOp::Eq, 1i64),
            ]))
            .order_by(SortField::new("id", SortDir::Asc));

        let err = validate_query("posts", &query).unwrap_err();
        assert_eq!(
            err,
            SqlError::InvalidIdentifier {
                context: "filter field",
                name: "bad field".into()
            }
        );
    }

    #[test]
    fn test_validate_query_table() {
        let err = validate_query("posts;", &Query::new(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid SQL table name 'posts;': must start with letter/underscore, \
             contain only ASCII alphanumeric/underscore, and be 1-63 chars"
        );
    }
}
