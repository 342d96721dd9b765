//! Command handlers for CLI operations
//!
//! This module implements the handlers for all CLI commands:
//! - run: Generate, record and publish today's question
//! - theme: Show the resolved theme and the prompt a run would send
//! - history: Show the last N recorded questions

use anyhow::Result;
use serde_json::json;

use crate::calendar::RunDate;
use crate::config::Config;
use crate::history::HistoryStore;
use crate::orchestrator::{run_guard, GeneratedQuestion, Orchestrator, RunOptions, RunOutcome};
use crate::prompt::build_prompt;
use crate::themes::ThemeResolver;

/// Output format for command results
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

/// Run the daily pipeline for `date`
///
/// Fails (non-zero exit) on exhausted candidates, a fatal generation error,
/// a missing credential or a storage failure. A publish failure is reported
/// in the output but does not fail the command.
pub async fn handle_run(
    config: &Config,
    date: &RunDate,
    dry_run: bool,
    format: OutputFormat,
) -> Result<()> {
    // An already-recorded day is a clean skip, even without a credential
    let log = HistoryStore::from_config(config).load();
    if let Some(outcome) = run_guard(&log, date) {
        print!("{}", render_outcome(&outcome, dry_run, format));
        return Ok(());
    }

    let orchestrator = Orchestrator::from_config(config)?;
    let outcome = orchestrator.run(date, RunOptions { dry_run }).await?;

    print!("{}", render_outcome(&outcome, dry_run, format));
    Ok(())
}

fn render_outcome(outcome: &RunOutcome, dry_run: bool, format: OutputFormat) -> String {
    match (outcome, format) {
        (RunOutcome::AlreadyRan { date, question }, OutputFormat::Json) => format!(
            "{}\n",
            json!({
                "status": "already_ran",
                "date": date,
                "question": question,
            })
        ),
        (RunOutcome::AlreadyRan { date, question }, OutputFormat::Text) => {
            format!("Already ran for {}.\n  {}\n", date, question)
        }
        (RunOutcome::Generated(generated), OutputFormat::Json) => {
            format!("{}\n", generated_json(generated, dry_run))
        }
        (RunOutcome::Generated(generated), OutputFormat::Text) => {
            let mut out = format!(
                "{}\n  {}\n\n  theme: {} ({})\n  model: {}\n",
                generated.date,
                generated.question,
                generated.theme.theme,
                generated.theme.source,
                generated.model
            );
            match &generated.delivery {
                None => out.push_str("  dry run: nothing written or published\n"),
                Some(delivery) => out.push_str(&format!("  publish: {}\n", delivery.as_str())),
            }
            out
        }
    }
}

fn generated_json(generated: &GeneratedQuestion, dry_run: bool) -> serde_json::Value {
    let failure = match &generated.delivery {
        Some(crate::notify::Delivery::Failed(reason)) => Some(reason.clone()),
        _ => None,
    };
    let status = if dry_run { "dry_run" } else { "generated" };

    json!({
        "status": status,
        "date": generated.date,
        "question": generated.question,
        "theme": generated.theme,
        "model": generated.model,
        "publish": generated.delivery.as_ref().map(|d| d.as_str()),
        "publish_error": failure,
    })
}

/// Show the theme for `date` and the prompt a run would send
///
/// Performs the holiday lookup but never calls the model, so no credential
/// is required.
pub async fn handle_theme(config: &Config, date: &RunDate, format: OutputFormat) -> Result<()> {
    let resolver = ThemeResolver::from_config(config);
    let theme = resolver.resolve(date).await;

    let log = HistoryStore::from_config(config).load();
    let recent = log.recent_questions(config.storage.history_window);
    let prompt = build_prompt(&theme, &recent);

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                json!({
                    "date": date.canonical(),
                    "theme": theme,
                    "prompt": prompt,
                })
            );
        }
        OutputFormat::Text => {
            println!("{}", date);
            println!(
                "  theme: {} ({}, {})",
                theme.theme,
                theme.source,
                if theme.is_major { "major" } else { "ambient" }
            );
            println!();
            println!("{}", prompt);
        }
    }

    Ok(())
}

/// Show the last `limit` recorded questions, newest first
pub async fn handle_history(config: &Config, limit: usize, format: OutputFormat) -> Result<()> {
    let log = HistoryStore::from_config(config).load();
    let entries: Vec<_> = log.entries().iter().take(limit).collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("No questions recorded yet.");
                return Ok(());
            }

            println!("Last {} question(s):", entries.len());
            println!();
            for entry in entries {
                println!("  {}", entry.date);
                println!("    {}", entry.question);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Delivery;
    use chrono::NaiveDate;
    use sdk::errors::EngineError;
    use sdk::types::{HistoryEntry, ThemeContext};
    use tempfile::TempDir;

    fn keyless_config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.core.data_dir = dir.path().to_path_buf();
        config.holidays.enabled = false;
        config.llm.api_key = None;
        config
    }

    fn generated(delivery: Option<Delivery>) -> RunOutcome {
        RunOutcome::Generated(GeneratedQuestion {
            date: "October 31, 2026".to_string(),
            question: "What's the best costume you've ever seen?".to_string(),
            theme: ThemeContext::novelty("Halloween"),
            model: "gemini-2.5-flash".to_string(),
            delivery,
        })
    }

    #[test]
    fn test_render_already_ran_json() {
        let outcome = RunOutcome::AlreadyRan {
            date: "October 31, 2026".to_string(),
            question: "Q?".to_string(),
        };
        let out = render_outcome(&outcome, false, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();

        assert_eq!(value["status"], "already_ran");
        assert_eq!(value["question"], "Q?");
    }

    #[test]
    fn test_render_generated_json_reports_publish_failure() {
        let outcome = generated(Some(Delivery::Failed("status 500".to_string())));
        let out = render_outcome(&outcome, false, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();

        assert_eq!(value["status"], "generated");
        assert_eq!(value["publish"], "failed");
        assert_eq!(value["publish_error"], "status 500");
        assert_eq!(value["theme"]["source"], "novelty");
    }

    #[test]
    fn test_render_dry_run_text() {
        let out = render_outcome(&generated(None), true, OutputFormat::Text);
        assert!(out.contains("dry run"));
        assert!(out.contains("Halloween (novelty)"));
    }

    #[tokio::test]
    async fn test_run_skips_recorded_day_without_credential() {
        let dir = TempDir::new().unwrap();
        let config = keyless_config(&dir);
        let date = RunDate::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());

        let store = HistoryStore::from_config(&config);
        store
            .append(store.load(), HistoryEntry::new(date.canonical(), "Recorded?"))
            .unwrap();
        let before = std::fs::read(config.history_path()).unwrap();

        let result = handle_run(&config, &date, false, OutputFormat::Text).await;

        assert!(result.is_ok(), "recorded day should skip: {:?}", result.err());
        assert_eq!(std::fs::read(config.history_path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_run_new_day_without_credential_fails() {
        let dir = TempDir::new().unwrap();
        let config = keyless_config(&dir);
        let date = RunDate::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());

        let err = handle_run(&config, &date, false, OutputFormat::Text)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<EngineError>(),
            Some(EngineError::MissingCredential(_))
        ));
        assert!(!config.history_path().exists());
    }
}
