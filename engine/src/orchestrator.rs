//! Daily run orchestration
//!
//! One invocation runs the whole pipeline once:
//!
//! 1. Load history and apply the run guard
//! 2. Resolve the theme
//! 3. Build the prompt from the theme and the recent-question window
//! 4. Generate through the candidate models
//! 5. Commit: history, then the current-question slot
//! 6. Publish
//!
//! Steps 4 and 5 are fatal on failure. Nothing is published unless both
//! succeeded, and a publish failure does not undo step 5.
//!
//! The history file is not locked. At most one invocation per day is assumed,
//! enforced by whatever schedules the job.

use sdk::errors::EngineError;
use sdk::types::{HistoryEntry, ThemeContext};
use std::sync::Arc;

use crate::calendar::RunDate;
use crate::config::Config;
use crate::history::{HistoryLog, HistoryStore};
use crate::llm::gemini::GeminiProvider;
use crate::llm::router::ModelRouter;
use crate::notify::{Delivery, DiscordWebhook, Publisher};
use crate::prompt::build_prompt;
use crate::secrets::scrub;
use crate::themes::ThemeResolver;

/// Result of a run that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Today's entry already exists; nothing was generated or published
    AlreadyRan { date: String, question: String },

    /// A question was generated (and, unless dry-run, committed)
    Generated(GeneratedQuestion),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedQuestion {
    pub date: String,
    pub question: String,
    pub theme: ThemeContext,
    pub model: String,
    /// `None` on a dry run
    pub delivery: Option<Delivery>,
}

/// Run-level options
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Generate but do not write or publish
    pub dry_run: bool,
}

/// Sequences one daily run
pub struct Orchestrator {
    store: HistoryStore,
    themes: ThemeResolver,
    router: ModelRouter,
    publisher: Arc<dyn Publisher>,
    models: Vec<String>,
    history_window: usize,
}

impl Orchestrator {
    pub fn new(
        store: HistoryStore,
        themes: ThemeResolver,
        router: ModelRouter,
        publisher: Arc<dyn Publisher>,
        models: Vec<String>,
        history_window: usize,
    ) -> Self {
        Self {
            store,
            themes,
            router,
            publisher,
            models,
            history_window,
        }
    }

    /// Wire the production collaborators described by `config`
    ///
    /// # Errors
    ///
    /// Returns `EngineError::MissingCredential` when no provider key is set.
    pub fn from_config(config: &Config) -> Result<Self, EngineError> {
        let api_key = config.require_api_key()?.clone();
        let provider = Arc::new(GeminiProvider::new(config.llm.gemini.clone(), api_key));

        Ok(Self::new(
            HistoryStore::from_config(config),
            ThemeResolver::from_config(config),
            ModelRouter::new(provider, config.llm_timeout()),
            Arc::new(DiscordWebhook::from_config(config)),
            config.llm.models.clone(),
            config.storage.history_window,
        ))
    }

    /// Run the pipeline for `date`
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails (exhausted candidates or a
    /// non-fallback failure) or if the local files cannot be written.
    pub async fn run(
        &self,
        date: &RunDate,
        options: RunOptions,
    ) -> Result<RunOutcome, EngineError> {
        tracing::info!("Starting question run for {}", date);

        let log = self.store.load();

        if let Some(outcome) = run_guard(&log, date) {
            return Ok(outcome);
        }

        let theme = self.themes.resolve(date).await;

        let recent = log.recent_questions(self.history_window);
        let prompt = build_prompt(&theme, &recent);
        tracing::debug!("Prompt:\n{}", prompt);

        let generation = self.router.generate(&prompt, &self.models).await?;

        if options.dry_run {
            tracing::info!("Dry run: not writing or publishing");
            return Ok(RunOutcome::Generated(GeneratedQuestion {
                date: date.canonical().to_string(),
                question: generation.text,
                theme,
                model: generation.model,
                delivery: None,
            }));
        }

        self.store.append(
            log,
            HistoryEntry::new(date.canonical(), generation.text.clone()),
        )?;
        self.store.write_current(&generation.text)?;
        tracing::info!("Recorded question for {}", date);

        let delivery = match self.publisher.publish(&generation.text, date).await {
            Ok(delivery) => delivery,
            Err(e) => {
                let reason = scrub(&e.to_string());
                tracing::error!("Publish failed, question stays recorded: {}", reason);
                Delivery::Failed(reason)
            }
        };

        Ok(RunOutcome::Generated(GeneratedQuestion {
            date: date.canonical().to_string(),
            question: generation.text,
            theme,
            model: generation.model,
            delivery: Some(delivery),
        }))
    }
}

/// `Some(AlreadyRan)` when the newest history entry is for `date`
///
/// Needs nothing but the log, so callers can apply it before any credential
/// is checked.
pub fn run_guard(log: &HistoryLog, date: &RunDate) -> Option<RunOutcome> {
    if !log.already_ran_on(date) {
        return None;
    }

    tracing::info!("Question for {} already recorded, skipping", date);
    Some(RunOutcome::AlreadyRan {
        date: date.canonical().to_string(),
        question: log
            .latest()
            .map(|entry| entry.question.clone())
            .unwrap_or_default(),
    })
}
