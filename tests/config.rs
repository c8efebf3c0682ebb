//! Configuration Integration Tests
//!
//! Config discovery, parsing and validation against real files.

use std::fs;
use std::path::{Path, PathBuf};

use case_retention::config::{load_config_from, ConfigViolation, ResolvedConfig};
use case_retention::domain::{
    HearingInfo, JudicialResult, JudicialResultCategory, JudicialResultPrompt, JurisdictionType,
    Offence, RetentionContext, RetentionPolicyType,
};
use case_retention::retention::rules::CUSTODIAL_RESULT_TYPE_ID;
use chrono::NaiveDate;
use tempfile::TempDir;
use uuid::Uuid;

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let config_dir = dir.join(".case-retention");
    fs::create_dir_all(&config_dir).unwrap();
    let path = config_dir.join("config.yaml");
    fs::write(&path, content).unwrap();
    path
}

fn hearing_info() -> HearingInfo {
    HearingInfo {
        hearing_id: Uuid::new_v4(),
        hearing_type: "Sentence".to_string(),
        jurisdiction_type: JurisdictionType::Crown,
        court_centre_id: Uuid::new_v4(),
        court_centre_name: "Exeter Crown Court".to_string(),
        court_room_id: None,
        court_room_name: None,
    }
}

#[test]
fn test_settings_flow_into_selector() {
    let temp = TempDir::new().unwrap();
    let path = write_config(
        temp.path(),
        r#"
version: "1"
retention:
  statutory_minimum: 10Y0M0D
  total_custodial_period_prompt: custodialTerm
"#,
    );

    let config = load_config_from(Some(path), temp.path()).unwrap();
    let anchor = NaiveDate::from_ymd_opt(2021, 6, 15).unwrap();
    let context = RetentionContext::new(hearing_info()).with_offence(Offence::new(vec![
        JudicialResult::new(CUSTODIAL_RESULT_TYPE_ID, JudicialResultCategory::Final, anchor)
            .with_prompt(JudicialResultPrompt::new("custodialTerm", "8 Years")),
    ]));

    let policy = config.selector().select(&context);
    assert_eq!(policy.policy_type, RetentionPolicyType::Custodial);
    assert_eq!(policy.period, "10Y0M0D");
}

#[test]
fn test_discovery_prefers_nearest_directory() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), "matching:\n  page_size: 50\n");
    let inner = temp.path().join("court");
    let inner_path = write_config(&inner, "matching:\n  page_size: 5\n");

    let config = load_config_from(None, &inner).unwrap();
    assert_eq!(config.matching.page_size, 5);
    assert_eq!(config.config_file, Some(inner_path));
}

#[test]
fn test_malformed_yaml_reports_path() {
    let temp = TempDir::new().unwrap();
    let path = write_config(temp.path(), "retention: [not, a, map");

    let err = load_config_from(Some(path.clone()), temp.path()).unwrap_err();
    assert!(format!("{:#}", err).contains(&path.display().to_string()));
}

#[test]
fn test_zero_page_size_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = write_config(temp.path(), "matching:\n  page_size: 0\n");

    let err = load_config_from(Some(path), temp.path()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ConfigViolation>(),
        Some(&ConfigViolation::ZeroPageSize)
    );
}

#[test]
fn test_defaults_are_valid() {
    let config = ResolvedConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.matching.page_size, 25);
    assert_eq!(config.retention.statutory_minimum, "7Y0M0D");
}
