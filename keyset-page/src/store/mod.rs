//! Reference query sources.

mod memory;

pub use memory::{MemoryStore, Row, matches};
