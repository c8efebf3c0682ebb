//! Retention rules.
//!
//! Each rule looks at one hearing's outcomes and either declines or proposes
//! a [`RetentionPolicy`]. Rules are plain functions held in a fixed table,
//! [`RULES`], whose order is the evaluation order and the priority order.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    JudicialResult, JudicialResultCategory, RetentionContext, RetentionPolicy,
    RetentionPolicyType, ACQUITTAL_SENTENCE, DEFAULT_PERIOD, LIFE_SENTENCE, NOT_GUILTY_SENTENCE,
};

use super::duration::{clamp_to_minimum, longest_duration, Period};

/// Custodial sentence (TIMP) result type
pub const CUSTODIAL_RESULT_TYPE_ID: Uuid = Uuid::from_u128(0x9403f0d7_90b5_4377_84b4_f06a77811362);

/// Absolute/conditional discharge result type
pub const DISCHARGE_RESULT_TYPE_ID: Uuid = Uuid::from_u128(0x14d66587_8fbe_424f_a369_b1144f1684e3);

/// Reference units and thresholds the rules are evaluated against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSettings {
    /// Result type that marks a custodial sentence
    #[serde(default = "default_custodial_result_type_id")]
    pub custodial_result_type_id: Uuid,

    /// Result type that marks a discharge
    #[serde(default = "default_discharge_result_type_id")]
    pub discharge_result_type_id: Uuid,

    /// Prompt reference carrying the total custodial period
    #[serde(default = "default_total_custodial_period_prompt")]
    pub total_custodial_period_prompt: String,

    /// Prompt references that mark a life sentence
    #[serde(default = "default_life_prompt_references")]
    pub life_prompt_references: Vec<String>,

    /// Prompt types that mark a life sentence
    #[serde(default)]
    pub life_prompt_type_ids: Vec<Uuid>,

    /// Verdict category counted as not guilty
    #[serde(default = "default_not_guilty_category")]
    pub not_guilty_category: String,

    /// Shortest custodial retention period, as `<Y>Y<M>M<D>D`
    #[serde(default = "default_statutory_minimum")]
    pub statutory_minimum: String,

    /// Remittal result types applied on top of the caller's list
    #[serde(default)]
    pub remittal_result_type_ids: Vec<Uuid>,
}

fn default_custodial_result_type_id() -> Uuid {
    CUSTODIAL_RESULT_TYPE_ID
}
fn default_discharge_result_type_id() -> Uuid {
    DISCHARGE_RESULT_TYPE_ID
}
fn default_total_custodial_period_prompt() -> String {
    "totalCustodialPeriod".to_string()
}
fn default_life_prompt_references() -> Vec<String> {
    vec![
        "lifeImprisonment".to_string(),
        "imprisonmentForLife".to_string(),
    ]
}
fn default_not_guilty_category() -> String {
    "Not Guilty".to_string()
}
fn default_statutory_minimum() -> String {
    DEFAULT_PERIOD.to_string()
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            custodial_result_type_id: default_custodial_result_type_id(),
            discharge_result_type_id: default_discharge_result_type_id(),
            total_custodial_period_prompt: default_total_custodial_period_prompt(),
            life_prompt_references: default_life_prompt_references(),
            life_prompt_type_ids: Vec::new(),
            not_guilty_category: default_not_guilty_category(),
            statutory_minimum: default_statutory_minimum(),
            remittal_result_type_ids: Vec::new(),
        }
    }
}

impl RuleSettings {
    /// Statutory minimum as a period (seven years if the setting is malformed)
    pub fn minimum_period(&self) -> Period {
        self.statutory_minimum
            .parse()
            .unwrap_or(Period::new(7, 0, 0))
    }
}

/// Signature shared by every rule
pub type RuleFn = fn(&RetentionContext, &RuleSettings) -> Option<RetentionPolicy>;

/// One entry in the rule table
#[derive(Clone, Copy)]
pub struct RetentionRule {
    pub policy_type: RetentionPolicyType,
    evaluate: RuleFn,
}

impl RetentionRule {
    pub const fn new(policy_type: RetentionPolicyType, evaluate: RuleFn) -> Self {
        Self {
            policy_type,
            evaluate,
        }
    }

    /// Whether the rule's trigger holds for this hearing
    pub fn applies(&self, context: &RetentionContext, settings: &RuleSettings) -> bool {
        self.policy(context, settings).is_some()
    }

    /// The policy this rule proposes, if it applies
    pub fn policy(&self, context: &RetentionContext, settings: &RuleSettings) -> Option<RetentionPolicy> {
        (self.evaluate)(context, settings)
    }
}

impl std::fmt::Debug for RetentionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetentionRule")
            .field("policy_type", &self.policy_type)
            .finish()
    }
}

/// Rules in evaluation and priority order
pub const RULES: [RetentionRule; 6] = [
    RetentionRule::new(RetentionPolicyType::Life, life_rule),
    RetentionRule::new(RetentionPolicyType::Custodial, custodial_rule),
    RetentionRule::new(RetentionPolicyType::Remittal, remittal_rule),
    RetentionRule::new(RetentionPolicyType::Acquittal, acquittal_rule),
    RetentionRule::new(RetentionPolicyType::NotGuilty, not_guilty_rule),
    RetentionRule::new(RetentionPolicyType::NonCustodial, non_custodial_rule),
];

fn policy(
    context: &RetentionContext,
    policy_type: RetentionPolicyType,
    period: impl Into<String>,
) -> RetentionPolicy {
    RetentionPolicy::new(policy_type, period, context.hearing_info.clone())
}

fn is_life_sentence(result: &JudicialResult, settings: &RuleSettings) -> bool {
    if result.life_duration == Some(true) {
        return true;
    }

    result.judicial_result_prompts.iter().any(|prompt| {
        let by_type = prompt
            .judicial_result_prompt_type_id
            .is_some_and(|id| settings.life_prompt_type_ids.contains(&id));
        let by_reference = settings
            .life_prompt_references
            .iter()
            .any(|r| prompt.has_reference(r));
        let life_term = prompt.has_reference(&settings.total_custodial_period_prompt)
            && prompt.value.trim().eq_ignore_ascii_case("life");

        by_type || by_reference || life_term
    })
}

/// Any offence carries a life sentence
pub fn life_rule(context: &RetentionContext, settings: &RuleSettings) -> Option<RetentionPolicy> {
    context
        .offence_results()
        .any(|r| is_life_sentence(r, settings))
        .then(|| policy(context, RetentionPolicyType::Life, LIFE_SENTENCE))
}

/// Custodial sentences: the longest total custodial period across offence- and
/// defendant-level results, never shorter than the statutory minimum
pub fn custodial_rule(context: &RetentionContext, settings: &RuleSettings) -> Option<RetentionPolicy> {
    let periods = context
        .all_results()
        .filter(|r| r.judicial_result_type_id == settings.custodial_result_type_id)
        .filter_map(|r| {
            r.prompt(&settings.total_custodial_period_prompt)
                .map(|p| (p.value.as_str(), r.ordered_date))
        });

    let longest = longest_duration(periods)?;
    let period = clamp_to_minimum(&longest, settings.minimum_period());
    Some(policy(context, RetentionPolicyType::Custodial, period.to_string()))
}

/// Any offence was remitted to another court
pub fn remittal_rule(context: &RetentionContext, settings: &RuleSettings) -> Option<RetentionPolicy> {
    let is_remittal = |id: &Uuid| {
        context.remittal_result_type_ids.contains(id) || settings.remittal_result_type_ids.contains(id)
    };

    context
        .offence_results()
        .any(|r| is_remittal(&r.judicial_result_type_id))
        .then(|| policy(context, RetentionPolicyType::Remittal, DEFAULT_PERIOD))
}

/// A final discharge on any offence, or a discharge recorded against the defendant
pub fn acquittal_rule(context: &RetentionContext, settings: &RuleSettings) -> Option<RetentionPolicy> {
    let discharge = settings.discharge_result_type_id;

    let offence_discharge = context.offence_results().any(|r| {
        r.category == JudicialResultCategory::Final && r.judicial_result_type_id == discharge
    });
    let defendant_discharge = context
        .defendant_judicial_results
        .iter()
        .any(|d| d.judicial_result.judicial_result_type_id == discharge);

    (offence_discharge || defendant_discharge)
        .then(|| policy(context, RetentionPolicyType::Acquittal, ACQUITTAL_SENTENCE))
}

/// Letters and digits only, lowercased: "NOT_GUILTY" and "Not Guilty" compare equal
fn category_key(category: &str) -> String {
    category
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Every offence, with none excepted, has a not-guilty verdict
pub fn not_guilty_rule(context: &RetentionContext, settings: &RuleSettings) -> Option<RetentionPolicy> {
    let wanted = category_key(&settings.not_guilty_category);

    let all_not_guilty = !context.offences.is_empty()
        && context.offences.iter().all(|offence| {
            offence
                .verdict
                .as_ref()
                .is_some_and(|v| category_key(&v.category) == wanted)
        });

    all_not_guilty.then(|| policy(context, RetentionPolicyType::NotGuilty, NOT_GUILTY_SENTENCE))
}

/// Fallback that always applies
pub fn non_custodial_rule(context: &RetentionContext, _settings: &RuleSettings) -> Option<RetentionPolicy> {
    Some(policy(context, RetentionPolicyType::NonCustodial, DEFAULT_PERIOD))
}
