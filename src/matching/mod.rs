//! Defendant match-criteria generation.
//!
//! This module contains:
//! - Pnc: alternate spellings of a PNC reference
//! - Criteria: the ordered key/value filter set sent to the search client
//! - Generator: exact and partial criteria sequences for one defendant

pub mod criteria;
pub mod generator;
pub mod pnc;

// Re-export commonly used types
pub use criteria::{MatchCriteria, DEFAULT_PAGE_SIZE};
pub use generator::{
    advance, CriteriaIter, Cursor, MatchCriteriaGenerator, MatchMode, Shape, EXACT_SHAPES,
    PARTIAL_SHAPES,
};
pub use pnc::pnc_candidates;
