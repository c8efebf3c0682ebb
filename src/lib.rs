//! case-retention - Court record retention and defendant matching
//!
//! Decides how long the records of a concluded hearing are kept, and
//! builds the search criteria used to find a defendant's earlier records.
//!
//! # Architecture
//!
//! Both engines are pure functions of their input:
//! - The retention rules inspect a hearing outcome and each propose a policy
//! - The selector keeps the highest priority proposal (longest period on ties)
//! - The match generator walks fixed criteria shapes over a defendant record
//!
//! # Modules
//!
//! - `domain`: Data structures (hearing outcome, policy, defendant)
//! - `retention`: Duration normalisation, retention rules, policy selection
//! - `matching`: PNC normalisation, match criteria, criteria generator
//! - `config`: YAML configuration discovery and validation
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Select the retention policy for a hearing
//! case-retention retention --input hearing.json
//!
//! # Generate match criteria for a defendant
//! case-retention match --input defendant.json --mode exact
//!
//! # Normalise a duration
//! case-retention duration "3000 days" --anchor 2021-06-15
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod matching;
pub mod retention;

// Re-export main types at crate root for convenience
pub use domain::{Defendant, RetentionContext, RetentionPolicy, RetentionPolicyType};
pub use matching::{pnc_candidates, MatchCriteria, MatchCriteriaGenerator};
pub use retention::{normalize_duration, Period, RetentionPolicySelector, RuleSettings};
