//! Retention policy selection.
//!
//! Runs every rule, keeps every policy that applies, and resolves the winner:
//! earliest rule first, then the longest period among policies of that type.

use std::cmp::Ordering;

use tracing::{debug, info, instrument};

use crate::domain::{RetentionContext, RetentionPolicy, RetentionPolicyType, DEFAULT_PERIOD};

use super::rules::{RuleSettings, RULES};

/// Chooses the single retention policy for a hearing
#[derive(Debug, Clone, Default)]
pub struct RetentionPolicySelector {
    settings: RuleSettings,
}

impl RetentionPolicySelector {
    pub fn new(settings: RuleSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RuleSettings {
        &self.settings
    }

    /// Every policy proposed by a rule that applies, in rule order
    pub fn candidates(&self, context: &RetentionContext) -> Vec<RetentionPolicy> {
        RULES
            .iter()
            .filter_map(|rule| {
                let policy = rule.policy(context, &self.settings)?;
                debug!(
                    policy_type = %policy.policy_type,
                    period = %policy.period,
                    "Retention rule applies"
                );
                Some(policy)
            })
            .collect()
    }

    /// The winning policy. Never empty: the non-custodial rule always applies.
    #[instrument(skip_all, fields(hearing_id = %context.hearing_info.hearing_id))]
    pub fn select(&self, context: &RetentionContext) -> RetentionPolicy {
        let policy = resolve_policy(self.candidates(context)).unwrap_or_else(|| {
            RetentionPolicy::new(
                RetentionPolicyType::NonCustodial,
                DEFAULT_PERIOD,
                context.hearing_info.clone(),
            )
        });

        info!(
            policy_type = %policy.policy_type,
            policy_code = policy.policy_code(),
            period = %policy.period,
            "Retention policy selected"
        );
        policy
    }
}

/// Highest-priority type wins; within a type the larger `period_days` wins.
/// Equal candidates resolve to the first one seen.
pub fn resolve_policy<I>(candidates: I) -> Option<RetentionPolicy>
where
    I: IntoIterator<Item = RetentionPolicy>,
{
    candidates.into_iter().min_by(compare_priority)
}

fn compare_priority(a: &RetentionPolicy, b: &RetentionPolicy) -> Ordering {
    a.policy_type
        .rank()
        .cmp(&b.policy_type.rank())
        .then_with(|| b.period_days().cmp(&a.period_days()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        HearingInfo, JurisdictionType, ACQUITTAL_SENTENCE, LIFE_SENTENCE, NOT_GUILTY_SENTENCE,
    };
    use uuid::Uuid;

    fn hearing_info() -> HearingInfo {
        HearingInfo {
            hearing_id: Uuid::new_v4(),
            hearing_type: "Trial".to_string(),
            jurisdiction_type: JurisdictionType::Crown,
            court_centre_id: Uuid::new_v4(),
            court_centre_name: "Snaresbrook Crown Court".to_string(),
            court_room_id: None,
            court_room_name: None,
        }
    }

    fn candidate(policy_type: RetentionPolicyType, period: &str) -> RetentionPolicy {
        RetentionPolicy::new(policy_type, period, hearing_info())
    }

    #[test]
    fn test_life_beats_everything() {
        let winner = resolve_policy(vec![
            candidate(RetentionPolicyType::NonCustodial, DEFAULT_PERIOD),
            candidate(RetentionPolicyType::NotGuilty, NOT_GUILTY_SENTENCE),
            candidate(RetentionPolicyType::Life, LIFE_SENTENCE),
        ])
        .unwrap();
        assert_eq!(winner.policy_type, RetentionPolicyType::Life);
    }

    #[test]
    fn test_longest_custodial_wins_over_acquittal() {
        let winner = resolve_policy(vec![
            candidate(RetentionPolicyType::Acquittal, ACQUITTAL_SENTENCE),
            candidate(RetentionPolicyType::Custodial, "8Y2M17D"),
            candidate(RetentionPolicyType::Custodial, "10Y3M25D"),
        ])
        .unwrap();
        assert_eq!(winner.policy_type, RetentionPolicyType::Custodial);
        assert_eq!(winner.period, "10Y3M25D");
    }

    #[test]
    fn test_tied_acquittals_stay_acquittal() {
        let winner = resolve_policy(vec![
            candidate(RetentionPolicyType::Acquittal, ACQUITTAL_SENTENCE),
            candidate(RetentionPolicyType::Acquittal, ACQUITTAL_SENTENCE),
        ])
        .unwrap();
        assert_eq!(winner.policy_type, RetentionPolicyType::Acquittal);
        assert_eq!(winner.policy_code(), "1");
    }

    #[test]
    fn test_no_candidates() {
        assert!(resolve_policy(Vec::new()).is_none());
    }

    #[test]
    fn test_select_defaults_to_non_custodial() {
        let selector = RetentionPolicySelector::default();
        let context = RetentionContext::new(hearing_info());

        let policy = selector.select(&context);
        assert_eq!(policy.policy_type, RetentionPolicyType::NonCustodial);
        assert_eq!(policy.period, DEFAULT_PERIOD);
        assert_eq!(policy.policy_code(), "2");
        assert_eq!(policy.hearing_info, context.hearing_info);
    }
}
