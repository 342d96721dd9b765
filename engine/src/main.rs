// Question of the Day
// Main entry point for the qotd binary

use clap::Parser;
use qotd_engine::calendar::{Clock, RunDate, SystemClock};
use qotd_engine::cli::{Cli, Command};
use qotd_engine::config::Config;
use qotd_engine::handlers::{handle_history, handle_run, handle_theme, OutputFormat};
use qotd_engine::secrets::scrub;
use qotd_engine::telemetry::{init_telemetry, init_telemetry_with_level};
use sdk::errors::{EngineError, QotdErrorExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Secrets usually live in a .env next to the job; a missing file is fine
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Determine output format
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_telemetry();
            report(&e);
            return Err(e.into());
        }
    };

    // --log wins over the config file; RUST_LOG wins over both
    init_telemetry_with_level(cli.log.as_deref().unwrap_or(&config.core.log_level));

    tracing::debug!("qotd v{}", env!("CARGO_PKG_VERSION"));

    // The run date is captured once and threaded through the whole run
    let today = match config.timezone() {
        Ok(tz) => SystemClock::new(tz).today(),
        Err(e) => {
            report(&e);
            return Err(e.into());
        }
    };

    let result = match cli.command {
        Command::Run { dry_run } => handle_run(&config, &today, dry_run, format).await,
        Command::Theme { date } => {
            let date = date.map(RunDate::new).unwrap_or(today);
            handle_theme(&config, &date, format).await
        }
        Command::History { limit } => handle_history(&config, limit, format).await,
    };

    if let Err(e) = &result {
        match e.downcast_ref::<EngineError>() {
            Some(engine_error) => report(engine_error),
            None => tracing::error!("{}", scrub(&e.to_string())),
        }
    }

    result
}

fn report(error: &EngineError) {
    tracing::error!(
        recoverable = error.is_recoverable(),
        "{} ({})",
        scrub(&error.to_string()),
        error.user_hint()
    );
}
