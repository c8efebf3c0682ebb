//! Defendant record consumed by the match-criteria generator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Treat `None`, empty and whitespace-only values the same way
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDetails {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub address: Option<Address>,
}

/// A defendant as seen by the record-linkage search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Defendant {
    #[serde(default)]
    pub pnc_id: Option<String>,
    #[serde(default)]
    pub cro_number: Option<String>,
    #[serde(default)]
    pub person_details: Option<PersonDetails>,
}

impl Defendant {
    pub fn pnc_id(&self) -> Option<&str> {
        present(&self.pnc_id)
    }

    pub fn cro_number(&self) -> Option<&str> {
        present(&self.cro_number)
    }

    pub fn first_name(&self) -> Option<&str> {
        self.person_details.as_ref().and_then(|p| present(&p.first_name))
    }

    pub fn last_name(&self) -> Option<&str> {
        self.person_details.as_ref().and_then(|p| present(&p.last_name))
    }

    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        self.person_details.as_ref().and_then(|p| p.date_of_birth)
    }

    pub fn address1(&self) -> Option<&str> {
        self.person_details
            .as_ref()
            .and_then(|p| p.address.as_ref())
            .and_then(|a| present(&a.address1))
    }
}
