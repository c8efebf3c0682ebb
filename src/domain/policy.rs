//! Retention policy types and the computed policy record.

use chrono::NaiveDate;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::hearing::HearingInfo;
use crate::retention::duration::Period;

/// Period recorded for life sentences
pub const LIFE_SENTENCE: &str = "LIFE_SENTENCE";

/// Period recorded for acquittals and discharges
pub const ACQUITTAL_SENTENCE: &str = "ACQUITTAL_SENTENCE";

/// Period recorded when every offence ends in a not-guilty verdict
pub const NOT_GUILTY_SENTENCE: &str = "NOT_GUILTY_SENTENCE";

/// Default retention period for remittals and non-custodial outcomes
pub const DEFAULT_PERIOD: &str = "7Y0M0D";

/// Anchor used to turn a period string into a comparable day count (1970-01-01)
pub fn nominal_anchor() -> NaiveDate {
    NaiveDate::default()
}

/// Classification of a retention policy.
///
/// Declaration order is the priority order: earlier variants win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RetentionPolicyType {
    Life,
    Custodial,
    Remittal,
    Acquittal,
    NotGuilty,
    NonCustodial,
}

/// (type, archival policy code) in priority order
const POLICY_CODES: [(RetentionPolicyType, &str); 6] = [
    (RetentionPolicyType::Life, "4"),
    (RetentionPolicyType::Custodial, "3"),
    (RetentionPolicyType::Remittal, "2"),
    (RetentionPolicyType::Acquittal, "1"),
    (RetentionPolicyType::NotGuilty, "1"),
    (RetentionPolicyType::NonCustodial, "2"),
];

impl RetentionPolicyType {
    /// All policy types in priority order
    pub const ALL: [RetentionPolicyType; 6] = [
        Self::Life,
        Self::Custodial,
        Self::Remittal,
        Self::Acquittal,
        Self::NotGuilty,
        Self::NonCustodial,
    ];

    /// Priority rank (0 is highest)
    pub fn rank(self) -> usize {
        POLICY_CODES
            .iter()
            .position(|(t, _)| *t == self)
            .unwrap_or(POLICY_CODES.len())
    }

    /// Code understood by the downstream archival system
    pub fn code(self) -> &'static str {
        POLICY_CODES
            .iter()
            .find(|(t, _)| *t == self)
            .map(|(_, code)| *code)
            .unwrap_or("2")
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Life => "LIFE",
            Self::Custodial => "CUSTODIAL",
            Self::Remittal => "REMITTAL",
            Self::Acquittal => "ACQUITTAL",
            Self::NotGuilty => "NOT_GUILTY",
            Self::NonCustodial => "NON_CUSTODIAL",
        }
    }
}

impl std::fmt::Display for RetentionPolicyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The retention decision for one hearing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionPolicy {
    pub policy_type: RetentionPolicyType,
    /// Canonical `<Y>Y<M>M<D>D` period or one of the sentence sentinels
    pub period: String,
    pub hearing_info: HearingInfo,
}

impl RetentionPolicy {
    pub fn new(policy_type: RetentionPolicyType, period: impl Into<String>, hearing_info: HearingInfo) -> Self {
        Self {
            policy_type,
            period: period.into(),
            hearing_info,
        }
    }

    pub fn policy_code(&self) -> &'static str {
        self.policy_type.code()
    }

    /// Length of the period in days from [`nominal_anchor`], used only to
    /// break ties between policies of the same type.
    pub fn period_days(&self) -> i64 {
        match self.period.as_str() {
            LIFE_SENTENCE => i64::MAX,
            ACQUITTAL_SENTENCE | NOT_GUILTY_SENTENCE => 0,
            period => period
                .parse::<Period>()
                .map(|p| p.days_from(nominal_anchor()))
                .unwrap_or(0),
        }
    }
}

impl Serialize for RetentionPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RetentionPolicy", 4)?;
        state.serialize_field("policyType", &self.policy_type)?;
        state.serialize_field("policyCode", self.policy_code())?;
        state.serialize_field("period", &self.period)?;
        state.serialize_field("hearingInfo", &self.hearing_info)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hearing::JurisdictionType;
    use uuid::Uuid;

    fn hearing_info() -> HearingInfo {
        HearingInfo {
            hearing_id: Uuid::nil(),
            hearing_type: "Sentence".to_string(),
            jurisdiction_type: JurisdictionType::Crown,
            court_centre_id: Uuid::nil(),
            court_centre_name: "Cardiff Crown Court".to_string(),
            court_room_id: None,
            court_room_name: Some("Courtroom 01".to_string()),
        }
    }

    #[test]
    fn test_policy_codes() {
        assert_eq!(RetentionPolicyType::Acquittal.code(), "1");
        assert_eq!(RetentionPolicyType::NotGuilty.code(), "1");
        assert_eq!(RetentionPolicyType::NonCustodial.code(), "2");
        assert_eq!(RetentionPolicyType::Remittal.code(), "2");
        assert_eq!(RetentionPolicyType::Custodial.code(), "3");
        assert_eq!(RetentionPolicyType::Life.code(), "4");
    }

    #[test]
    fn test_rank_follows_declaration_order() {
        for (i, policy_type) in RetentionPolicyType::ALL.iter().enumerate() {
            assert_eq!(policy_type.rank(), i);
        }
        assert!(RetentionPolicyType::Life < RetentionPolicyType::NonCustodial);
    }

    #[test]
    fn test_period_days() {
        let seven = RetentionPolicy::new(RetentionPolicyType::NonCustodial, DEFAULT_PERIOD, hearing_info());
        // 1970-01-01 to 1977-01-01 spans the 1972 and 1976 leap days
        assert_eq!(seven.period_days(), 2557);

        let life = RetentionPolicy::new(RetentionPolicyType::Life, LIFE_SENTENCE, hearing_info());
        assert_eq!(life.period_days(), i64::MAX);

        let acquittal = RetentionPolicy::new(RetentionPolicyType::Acquittal, ACQUITTAL_SENTENCE, hearing_info());
        assert_eq!(acquittal.period_days(), 0);
    }

    #[test]
    fn test_serializes_policy_code() {
        let policy = RetentionPolicy::new(RetentionPolicyType::Custodial, "8Y2M17D", hearing_info());
        let json = serde_json::to_value(&policy).unwrap();

        assert_eq!(json["policyType"], "CUSTODIAL");
        assert_eq!(json["policyCode"], "3");
        assert_eq!(json["period"], "8Y2M17D");
        assert_eq!(json["hearingInfo"]["courtCentreName"], "Cardiff Crown Court");
    }
}
