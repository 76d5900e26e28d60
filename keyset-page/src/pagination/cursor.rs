//! Cursor encoding/decoding for pagination.

use thiserror::Error;

use crate::value::Value;

use super::encoding::{base64_decode, base64_encode};

/// Maximum allowed cursor size in bytes (4KB).
/// This prevents DoS attacks via oversized cursor payloads.
pub const MAX_CURSOR_SIZE: usize = 4 * 1024;

/// A record's location in the `(pagination field, primary key)` order.
///
/// `Single` is used when the pagination field is itself the primary key,
/// `Composite` otherwise, always in `(pagination value, primary key value)`
/// order.
///
/// On the wire a position is a JSON array of one or two scalars, base64
/// encoded (URL-safe, no padding).
///
/// # Security Note
///
/// Cursors use simple base64 encoding, **not encryption**. The cursor content
/// is easily decoded by clients. Do not paginate on fields holding sensitive
/// data.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "position must be encoded with .encode() to produce a cursor"]
pub enum Position {
    /// Position on a unique pagination field.
    Single(Value),
    /// Position on a non-unique pagination field, tie-broken by primary key.
    Composite(Value, Value),
}

impl Position {
    /// Number of components (1 or 2).
    #[inline]
    #[must_use]
    pub const fn arity(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Composite(..) => 2,
        }
    }

    /// The pagination field value.
    #[inline]
    #[must_use]
    pub const fn field_value(&self) -> &Value {
        match self {
            Self::Single(v) | Self::Composite(v, _) => v,
        }
    }

    /// The primary key tie-break value, if any.
    #[inline]
    #[must_use]
    pub const fn key_value(&self) -> Option<&Value> {
        match self {
            Self::Single(_) => None,
            Self::Composite(_, pk) => Some(pk),
        }
    }

    /// Encode to an opaque cursor token.
    ///
    /// Deterministic: the same position always yields the same token. Fails
    /// for NaN and infinite floats, which JSON cannot carry.
    pub fn encode(&self) -> Result<String, CursorError> {
        let finite = |v: &Value| !matches!(v, Value::Float(f) if !f.is_finite());
        if !finite(self.field_value()) || !self.key_value().is_none_or(finite) {
            return Err(CursorError::NonFiniteFloat);
        }
        let json = match self {
            Self::Single(v) => serde_json::to_vec(&[v]),
            Self::Composite(v, pk) => serde_json::to_vec(&[v, pk]),
        }
        .map_err(|_| CursorError::InvalidFormat)?;
        Ok(base64_encode(&json))
    }

    /// Decode a cursor token.
    ///
    /// Rejects tokens over [`MAX_CURSOR_SIZE`], bad base64, anything that is
    /// not a JSON array of scalars, and arrays that are not 1 or 2 long.
    pub fn decode(encoded: &str) -> Result<Self, CursorError> {
        // Check size before decoding to prevent DoS attacks
        if encoded.len() > MAX_CURSOR_SIZE {
            return Err(CursorError::TooLarge);
        }
        let json = base64_decode(encoded).map_err(|_| CursorError::InvalidBase64)?;
        let mut values: Vec<Value> =
            serde_json::from_slice(&json).map_err(|_| CursorError::InvalidFormat)?;

        match values.len() {
            1 => Ok(Self::Single(values.remove(0))),
            2 => {
                let pk = values.remove(1);
                Ok(Self::Composite(values.remove(0), pk))
            },
            found => Err(CursorError::InvalidArity { found }),
        }
    }
}

/// Decode an optional token; an absent or empty token is no position.
pub fn decode_cursor(token: Option<&str>) -> Result<Option<Position>, CursorError> {
    match token {
        Some(t) if !t.is_empty() => Position::decode(t).map(Some),
        _ => Ok(None),
    }
}

/// Errors that can occur when decoding a cursor.
///
/// All variants are client-input faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CursorError {
    /// The base64 encoding is invalid.
    #[error("invalid base64 encoding in cursor")]
    InvalidBase64,
    /// The payload is not a JSON array of scalar values.
    #[error("invalid cursor format (expected JSON array of scalars)")]
    InvalidFormat,
    /// The payload has the wrong number of components.
    #[error("cursor must hold 1 or 2 values, found {found}")]
    InvalidArity {
        /// Number of values found.
        found: usize,
    },
    /// The cursor does not fit the pagination field it is used with.
    #[error("cursor holds {found} value(s) but this pagination field needs {expected}")]
    ArityMismatch {
        /// Number of values the keyset needs.
        expected: usize,
        /// Number of values in the cursor.
        found: usize,
    },
    /// The cursor exceeds the maximum allowed size.
    #[error("cursor exceeds maximum size ({}KB limit)", MAX_CURSOR_SIZE / 1024)]
    TooLarge,
    /// A position value is NaN or infinite and has no JSON form.
    #[error("cursor values must be finite numbers")]
    NonFiniteFloat,
}

impl CursorError {
    /// Returns `true` if this is an encoding/format error.
    #[inline]
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidBase64 | Self::InvalidFormat | Self::InvalidArity { .. }
        )
    }

    /// Returns `true` if this is a size/limit error.
    #[inline]
    #[must_use]
    pub const fn is_limit_error(&self) -> bool {
        matches!(self, Self::TooLarge)
    }
}

/// Trait for types that can supply an optional cursor token.
///
/// Lets request builders take `&str`, `String` or `Option<_>` directly, so
/// `query.get("after")` results can be passed through as-is. Empty strings
/// count as no token.
///
/// # Example
///
/// ```
/// # use keyset_page::IntoCursorToken;
/// assert_eq!("abc".into_cursor_token(), Some("abc".to_string()));
/// assert_eq!("".into_cursor_token(), None);
///
/// let none: Option<&str> = None;
/// assert!(none.into_cursor_token().is_none());
/// ```
pub trait IntoCursorToken {
    /// Convert into an optional token.
    fn into_cursor_token(self) -> Option<String>;
}

impl IntoCursorToken for &str {
    fn into_cursor_token(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl IntoCursorToken for String {
    fn into_cursor_token(self) -> Option<String> {
        if self.is_empty() { None } else { Some(self) }
    }
}

impl IntoCursorToken for &String {
    fn into_cursor_token(self) -> Option<String> {
        self.as_str().into_cursor_token()
    }
}

impl<T: IntoCursorToken> IntoCursorToken for Option<T> {
    fn into_cursor_token(self) -> Option<String> {
        self.and_then(IntoCursorToken::into_cursor_token)
    }
}
