//! Page and PageInfo structs for pagination responses.

use serde::{Deserialize, Serialize};

use super::cursor::{CursorError, Position};

/// Cursor state for a returned page.
///
/// Serializes as `{"hasNext", "hasPrevious", "before", "after"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether there are more items after this page.
    pub has_next: bool,
    /// Whether there are items before this page.
    pub has_previous: bool,
    /// Cursor of the first result, to fetch the previous page.
    pub before: Option<String>,
    /// Cursor of the last result, to fetch the next page.
    pub after: Option<String>,
}

impl PageInfo {
    /// Create page info with the given flags and no cursors.
    #[must_use]
    pub const fn new(has_next: bool, has_previous: bool) -> Self {
        Self {
            has_next,
            has_previous,
            before: None,
            after: None,
        }
    }

    /// Set the boundary cursors from the first and last result positions.
    pub fn with_bounds(mut self, first: &Position, last: &Position) -> Result<Self, CursorError> {
        self.before = Some(first.encode()?);
        self.after = Some(last.encode()?);
        Ok(self)
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Page<R> {
    /// Results in display order, at most `limit` long.
    pub results: Vec<R>,
    /// Total filtered count, when requested.
    pub count: Option<u64>,
    /// Flags and boundary cursors.
    pub cursors: PageInfo,
}

impl<R> Page<R> {
    /// Assemble a page.
    #[must_use]
    pub const fn new(results: Vec<R>, count: Option<u64>, cursors: PageInfo) -> Self {
        Self {
            results,
            count,
            cursors,
        }
    }

    /// Whether there are more items after this page.
    #[inline]
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.cursors.has_next
    }

    /// Whether there are items before this page.
    #[inline]
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.cursors.has_previous
    }

    /// Cursor of the first result.
    #[must_use]
    pub fn before(&self) -> Option<&str> {
        self.cursors.before.as_deref()
    }

    /// Cursor of the last result.
    #[must_use]
    pub fn after(&self) -> Option<&str> {
        self.cursors.after.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_page_info_basic() {
        let info = PageInfo::new(true, false);
        assert!(info.has_next);
        assert!(!info.has_previous);
        assert!(info.before.is_none());
        assert!(info.after.is_none());
    }

    #[test]
    fn test_page_info_with_bounds() {
        let first = Position::Single(Value::Int(1));
        let last = Position::Single(Value::Int(9));
        let info = PageInfo::new(false, true)
            .with_bounds(&first, &last)
            .unwrap();

        assert_eq!(info.before, first.encode().ok());
        assert_eq!(info.after, last.encode().ok());
    }

    #[test]
    fn test_page_info_unencodable_bound() {
        let first = Position::Single(Value::Int(1));
        let last = Position::Single(Value::Float(f64::INFINITY));
        assert_eq!(
            PageInfo::new(false, false).with_bounds(&first, &last),
            Err(CursorError::NonFiniteFloat)
        );
    }

    #[test]
    fn test_page_wire_shape() {
        let page = Page::new(vec![1, 2], None, PageInfo::new(true, false));
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "results": [1, 2],
                "count": null,
                "cursors": {
                    "hasNext": true,
                    "hasPrevious": false,
                    "before": null,
                    "after": null
                }
            })
        );
    }
}
