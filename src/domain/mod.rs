//! Domain types for the retention engine and match generator.
//!
//! This module contains the core data structures:
//! - Hearing: outcome projections (offences, judicial results, prompts)
//! - Policy: retention policy types and the computed policy
//! - Defendant: identifiers and person details used for matching

pub mod defendant;
pub mod hearing;
pub mod policy;

// Re-export commonly used types
pub use defendant::{Address, Defendant, PersonDetails};
pub use hearing::{
    DefendantJudicialResult, HearingInfo, JudicialResult, JudicialResultCategory,
    JudicialResultPrompt, JurisdictionType, Offence, RetentionContext, Verdict,
};
pub use policy::{
    RetentionPolicy, RetentionPolicyType, ACQUITTAL_SENTENCE, DEFAULT_PERIOD, LIFE_SENTENCE,
    NOT_GUILTY_SENTENCE,
};
