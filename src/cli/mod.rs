//! Command-line interface for case-retention.
//!
//! Provides commands for selecting a retention policy for a hearing,
//! generating defendant match criteria, normalising durations and PNC
//! references, and showing the resolved configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config;
use crate::domain::{Defendant, RetentionContext};
use crate::matching::{pnc_candidates, MatchCriteriaGenerator, MatchMode};
use crate::retention::normalize_duration;

/// case-retention - Court record retention and defendant matching
#[derive(Parser, Debug)]
#[command(name = "case-retention")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Select the retention policy for a hearing outcome
    Retention {
        /// Hearing outcome JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Additional remittal result type ids
        #[arg(long = "remittal-id")]
        remittal_ids: Vec<Uuid>,
    },

    /// Generate match criteria for a defendant
    Match {
        /// Defendant JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Which criteria sequence to print
        #[arg(short, long, value_enum, default_value = "both")]
        mode: ModeArg,

        /// Court order validity date (defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Normalise a free-text duration to a period
    Duration {
        /// Duration text, e.g. "2 years 6 months"
        text: String,

        /// Anchor date (defaults to today)
        #[arg(short, long)]
        anchor: Option<NaiveDate>,
    },

    /// Show the lookup spellings of a PNC reference
    Pnc {
        /// PNC reference, with or without its slash
        id: String,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Criteria sequence selection for the match command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Exact,
    Partial,
    Both,
}

impl ModeArg {
    fn modes(self) -> &'static [MatchMode] {
        match self {
            ModeArg::Exact => &[MatchMode::Exact],
            ModeArg::Partial => &[MatchMode::Partial],
            ModeArg::Both => &[MatchMode::Exact, MatchMode::Partial],
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Retention {
                input,
                remittal_ids,
            } => select_retention(&input, remittal_ids).await,
            Commands::Match { input, mode, date } => generate_matches(&input, mode, date).await,
            Commands::Duration { text, anchor } => {
                show_duration(&text, anchor);
                Ok(())
            }
            Commands::Pnc { id } => show_pnc(&id),
            Commands::Config => show_config(),
        }
    }
}

/// Read and parse a JSON input file
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    if content.trim().is_empty() {
        anyhow::bail!("Input file is empty: {}", path.display());
    }

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse input file: {}", path.display()))
}

/// Select and print the retention policy for a hearing
async fn select_retention(input: &Path, remittal_ids: Vec<Uuid>) -> Result<()> {
    let cfg = config::config()?;

    let mut context: RetentionContext = read_json(input).await?;
    context.remittal_result_type_ids.extend(remittal_ids);

    let policy = cfg.selector().select(&context);
    println!("{}", serde_json::to_string_pretty(&policy)?);

    Ok(())
}

/// Print each match criteria as one JSON line
async fn generate_matches(input: &Path, mode: ModeArg, date: Option<NaiveDate>) -> Result<()> {
    let cfg = config::config()?;

    let defendant: Defendant = read_json(input).await?;
    let today = date.unwrap_or_else(|| Local::now().date_naive());
    let generator =
        MatchCriteriaGenerator::with_page_size(defendant, today, cfg.matching.page_size);

    let mut count = 0;
    for &mode in mode.modes() {
        for criteria in generator.iter(mode) {
            println!("{}", serde_json::to_string(&criteria)?);
            count += 1;
        }
    }

    if count == 0 {
        eprintln!("[No criteria: defendant has no usable identifiers]");
    }

    Ok(())
}

fn show_duration(text: &str, anchor: Option<NaiveDate>) {
    let anchor = anchor.unwrap_or_else(|| Local::now().date_naive());
    let normalized = normalize_duration(text, anchor);

    println!("{}", normalized.period);
    eprintln!(
        "[{} to {}: {} days]",
        normalized.anchor,
        normalized.end,
        normalized.total_days()
    );
}

fn show_pnc(id: &str) -> Result<()> {
    let candidates = pnc_candidates(id);
    if candidates.is_empty() {
        anyhow::bail!("PNC reference is empty");
    }

    for candidate in candidates {
        println!("{}", candidate);
    }

    Ok(())
}

fn show_config() -> Result<()> {
    let cfg = config::config()?;
    let retention = &cfg.retention;

    println!("case-retention configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Retention:");
    println!("  Custodial result type:  {}", retention.custodial_result_type_id);
    println!("  Discharge result type:  {}", retention.discharge_result_type_id);
    println!("  Custodial period prompt: {}", retention.total_custodial_period_prompt);
    println!("  Life prompt references: {}", retention.life_prompt_references.join(", "));
    println!("  Life prompt type ids:   {}", retention.life_prompt_type_ids.len());
    println!("  Not guilty category:    {}", retention.not_guilty_category);
    println!("  Statutory minimum:      {}", retention.statutory_minimum);
    println!("  Remittal result types:  {}", retention.remittal_result_type_ids.len());
    println!();
    println!("Matching:");
    println!("  Page size: {}", cfg.matching.page_size);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_match_command() {
        let cli = Cli::try_parse_from([
            "case-retention",
            "match",
            "--input",
            "defendant.json",
            "--mode",
            "partial",
            "--date",
            "2026-03-09",
        ])
        .unwrap();

        match cli.command {
            Commands::Match { input, mode, date } => {
                assert_eq!(input, PathBuf::from("defendant.json"));
                assert_eq!(mode, ModeArg::Partial);
                assert_eq!(date, NaiveDate::from_ymd_opt(2026, 3, 9));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_remittal_ids() {
        let cli = Cli::try_parse_from([
            "case-retention",
            "retention",
            "-i",
            "hearing.json",
            "--remittal-id",
            "5f3c2d10-8a9e-4b7c-9d1e-2f3a4b5c6d7e",
        ])
        .unwrap();

        match cli.command {
            Commands::Retention { remittal_ids, .. } => assert_eq!(remittal_ids.len(), 1),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_mode_both_runs_exact_first() {
        assert_eq!(ModeArg::Both.modes(), &[MatchMode::Exact, MatchMode::Partial]);
    }

    #[tokio::test]
    async fn test_read_json_defendant() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("defendant.json");
        tokio::fs::write(
            &path,
            r#"{"pncId":"2099/1234567L","personDetails":{"lastName":"SMITT"}}"#,
        )
        .await
        .unwrap();

        let defendant: Defendant = read_json(&path).await.unwrap();
        assert_eq!(defendant.pnc_id(), Some("2099/1234567L"));
        assert_eq!(defendant.last_name(), Some("SMITT"));
    }

    #[tokio::test]
    async fn test_read_json_rejects_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("hearing.json");
        tokio::fs::write(&path, "  \n").await.unwrap();

        let err = read_json::<RetentionContext>(&path).await.unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[tokio::test]
    async fn test_read_json_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = read_json::<Defendant>(&temp.path().join("missing.json")).await;
        assert!(result.is_err());
    }
}
