//! Search and pagination over a department collection.
//!
//! # Responsibility
//! - Produce the slice of departments a list view displays.
//!
//! # Invariants
//! - A page never holds more than `page_size` items.
//! - `total_pages` is at least `1`, even for an empty result.
//! - An out-of-range page yields an empty slice; it is never clamped.

mod projection;

pub use projection::{project, PageView, ViewQuery, DEFAULT_PAGE_SIZE};
