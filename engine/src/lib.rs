//! Question of the Day Engine Library
//!
//! This library provides the core functionality of the qotd engine.
//! It is used by both the main binary and integration tests.

/// Run date and clock abstraction
pub mod calendar;

/// Configuration management module
pub mod config;

/// Secret handling and log scrubbing
pub mod secrets;

/// Persisted question history
pub mod history;

/// Theme resolution (holidays, novelty days, weekly vibes)
pub mod themes;

/// Prompt construction
pub mod prompt;

/// LLM provider abstraction layer
pub mod llm;

/// Outbound notification
pub mod notify;

/// Daily run orchestration
pub mod orchestrator;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
