//! Score extraction, keyword categorization, and ranking.
//!
//! This crate turns the loose rows produced by `benchbrief-source` into the
//! per-category top lists the report renders: extract numeric scores and
//! normalize them, bucket records by keyword match, then rank each bucket.

pub mod categorize;
pub mod extract;
pub mod rank;

pub use categorize::{CategoryKeywords, categorize};
pub use extract::{extract_all, extract_records, normalize_unit, parse_score};
pub use rank::{rank, summarize};
