//! Retention policy engine.
//!
//! This module contains:
//! - Duration: free-text duration normalisation against an anchor date
//! - Rules: the six retention rules in priority order
//! - Selector: runs the rules and resolves the winning policy

pub mod duration;
pub mod rules;
pub mod selector;

// Re-export commonly used types
pub use duration::{normalize_duration, parse_duration, DurationParts, NormalizedDuration, Period};
pub use rules::{RetentionRule, RuleSettings, RULES};
pub use selector::{resolve_policy, RetentionPolicySelector};
