//! Hearing outcome projections consumed by the retention engine.
//!
//! These are read-only views over the records the case-progression service
//! hands us. Every collection treats `null` and "missing" as empty.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Deserialize a collection that may be absent or explicitly `null`.
pub(crate) fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Court jurisdiction of a hearing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JurisdictionType {
    Crown,
    Magistrates,
}

/// Hearing metadata attached to every computed policy for traceability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HearingInfo {
    pub hearing_id: Uuid,
    pub hearing_type: String,
    pub jurisdiction_type: JurisdictionType,
    pub court_centre_id: Uuid,
    pub court_centre_name: String,
    #[serde(default)]
    pub court_room_id: Option<Uuid>,
    #[serde(default)]
    pub court_room_name: Option<String>,
}

/// Category of a judicial result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JudicialResultCategory {
    Final,
    Ancillary,
    Intermediary,
}

/// Free-text annotation a court clerk attached to a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudicialResultPrompt {
    #[serde(default)]
    pub judicial_result_prompt_type_id: Option<Uuid>,
    #[serde(default)]
    pub prompt_reference: Option<String>,
    #[serde(default)]
    pub value: String,
}

impl JudicialResultPrompt {
    pub fn new(reference: &str, value: &str) -> Self {
        Self {
            judicial_result_prompt_type_id: None,
            prompt_reference: Some(reference.to_string()),
            value: value.to_string(),
        }
    }

    /// Case-insensitive match on the prompt reference
    pub fn has_reference(&self, reference: &str) -> bool {
        self.prompt_reference
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case(reference))
    }
}

/// A judicial result recorded against an offence or a defendant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudicialResult {
    pub judicial_result_type_id: Uuid,
    pub category: JudicialResultCategory,
    pub ordered_date: NaiveDate,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub life_duration: Option<bool>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub judicial_result_prompts: Vec<JudicialResultPrompt>,
}

impl JudicialResult {
    pub fn new(
        judicial_result_type_id: Uuid,
        category: JudicialResultCategory,
        ordered_date: NaiveDate,
    ) -> Self {
        Self {
            judicial_result_type_id,
            category,
            ordered_date,
            label: None,
            life_duration: None,
            judicial_result_prompts: Vec::new(),
        }
    }

    /// Attach a prompt
    pub fn with_prompt(mut self, prompt: JudicialResultPrompt) -> Self {
        self.judicial_result_prompts.push(prompt);
        self
    }

    /// Flag the result as a life sentence
    pub fn with_life_duration(mut self, life: bool) -> Self {
        self.life_duration = Some(life);
        self
    }

    /// First prompt carrying the given reference
    pub fn prompt(&self, reference: &str) -> Option<&JudicialResultPrompt> {
        self.judicial_result_prompts
            .iter()
            .find(|p| p.has_reference(reference))
    }
}

/// Verdict entered against an offence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    /// Verdict category, e.g. "Guilty" or "Not Guilty"
    pub category: String,
    #[serde(default)]
    pub verdict_date: Option<NaiveDate>,
}

impl Verdict {
    pub fn new(category: &str) -> Self {
        Self {
            category: category.to_string(),
            verdict_date: None,
        }
    }
}

/// An offence on the hearing and its outcomes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offence {
    pub id: Uuid,
    #[serde(default)]
    pub verdict: Option<Verdict>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub judicial_results: Vec<JudicialResult>,
}

impl Offence {
    pub fn new(judicial_results: Vec<JudicialResult>) -> Self {
        Self {
            id: Uuid::new_v4(),
            verdict: None,
            judicial_results,
        }
    }

    pub fn with_verdict(mut self, verdict: Verdict) -> Self {
        self.verdict = Some(verdict);
        self
    }
}

/// A judicial result recorded at defendant level rather than per offence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefendantJudicialResult {
    #[serde(default)]
    pub master_defendant_id: Option<Uuid>,
    pub judicial_result: JudicialResult,
}

impl DefendantJudicialResult {
    pub fn new(judicial_result: JudicialResult) -> Self {
        Self {
            master_defendant_id: None,
            judicial_result,
        }
    }
}

/// Everything the retention engine looks at for one hearing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionContext {
    pub hearing_info: HearingInfo,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub offences: Vec<Offence>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub defendant_judicial_results: Vec<DefendantJudicialResult>,
    /// Caller-supplied result types that mark a remittal
    #[serde(default, deserialize_with = "nullable_vec")]
    pub remittal_result_type_ids: Vec<Uuid>,
}

impl RetentionContext {
    pub fn new(hearing_info: HearingInfo) -> Self {
        Self {
            hearing_info,
            offences: Vec::new(),
            defendant_judicial_results: Vec::new(),
            remittal_result_type_ids: Vec::new(),
        }
    }

    pub fn with_offence(mut self, offence: Offence) -> Self {
        self.offences.push(offence);
        self
    }

    pub fn with_defendant_result(mut self, result: DefendantJudicialResult) -> Self {
        self.defendant_judicial_results.push(result);
        self
    }

    pub fn with_remittal_ids(mut self, ids: Vec<Uuid>) -> Self {
        self.remittal_result_type_ids = ids;
        self
    }

    /// Every offence-level judicial result
    pub fn offence_results(&self) -> impl Iterator<Item = &JudicialResult> {
        self.offences.iter().flat_map(|o| o.judicial_results.iter())
    }

    /// Offence-level results followed by defendant-level results
    pub fn all_results(&self) -> impl Iterator<Item = &JudicialResult> {
        self.offence_results().chain(
            self.defendant_judicial_results
                .iter()
                .map(|d| &d.judicial_result),
        )
    }
}
