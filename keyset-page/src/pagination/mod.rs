//! Cursor codec, keyset predicate builder and page types.
//!
//! # How It Works
//!
//! Instead of skipping rows with OFFSET, keyset pagination seeks past the
//! boundary row of the previous page using the values it was sorted on. A
//! page is cut from the total order `(field, primary key)`; the primary key
//! only joins the order (and the cursor) when `field` is not unique.
//!
//! | Keyset            | Position       | Seek predicate (forward, ASC)             |
//! |-------------------|----------------|-------------------------------------------|
//! | `id`              | `[id]`         | `id > $1`                                 |
//! | `score`, `id`     | `[score, id]`  | `score > $1 OR (score = $1 AND id > $2)`  |
//!
//! NULL sorts below every other value, in memory and in the rendered
//! `ORDER BY`, so the seek predicate switches to `IS NULL` tests when the
//! boundary value is NULL.
//!
//! # Example
//!
//! ```
//! use keyset_page::{Keyset, KeysetCondition, Position, SortDir, Value};
//!
//! let keyset = Keyset::new("score", "id");
//! let token = Position::Composite(Value::Int(10), Value::Int(2)).encode().unwrap();
//!
//! let position = Position::decode(&token).unwrap();
//! let condition = KeysetCondition::new(&keyset, position, SortDir::Asc).unwrap();
//! let _predicate = condition.to_predicate();
//! ```

mod cursor;
mod encoding;
mod keyset;
mod page_info;

// Re-export all public items
pub use cursor::{CursorError, IntoCursorToken, MAX_CURSOR_SIZE, Position, decode_cursor};
pub use keyset::{BoundaryError, Keyset, KeysetCondition};
pub use page_info::{Page, PageInfo};
