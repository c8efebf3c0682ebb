//! Search criteria handed to the record-linkage client.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const PAGE_SIZE: &str = "pageSize";
pub const PROCEEDINGS_CONCLUDED: &str = "proceedingsConcluded";
pub const COURT_ORDER_VALIDITY_DATE: &str = "courtOrderValidityDate";
pub const CROWN_OR_MAGISTRATES: &str = "crownOrMagistrates";

pub const PNC_ID: &str = "pncId";
pub const CRO_NUMBER: &str = "croNumber";
pub const LAST_NAME: &str = "lastName";
pub const FIRST_NAME: &str = "firstName";
pub const DATE_OF_BIRTH: &str = "dateOfBirth";
pub const ADDRESS1: &str = "address1";

/// Number of baseline fields on every criteria object
pub const BASELINE_FIELDS: usize = 4;

/// Default number of results requested per lookup
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Render a date as `yyyy-MM-dd`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// One filter set for a defendant lookup, keys in insertion order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchCriteria(Map<String, Value>);

impl MatchCriteria {
    /// Criteria holding only the baseline fields
    pub fn baseline(today: NaiveDate, page_size: u32) -> Self {
        let mut fields = Map::new();
        fields.insert(PAGE_SIZE.to_string(), Value::from(page_size));
        fields.insert(PROCEEDINGS_CONCLUDED.to_string(), Value::Bool(false));
        fields.insert(
            COURT_ORDER_VALIDITY_DATE.to_string(),
            Value::String(format_date(today)),
        );
        fields.insert(CROWN_OR_MAGISTRATES.to_string(), Value::Bool(true));
        Self(fields)
    }

    /// Add a string field
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.0.insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Add a date field
    pub fn with_date(self, key: &str, date: NaiveDate) -> Self {
        let value = format_date(date);
        self.with(key, &value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of a field
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}
