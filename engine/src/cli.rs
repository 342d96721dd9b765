//! CLI interface for qotd
//!
//! This module provides the command-line interface using clap's derive API.
//! It defines all commands and global flags. The binary is meant to be run
//! once a day by an external scheduler.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Question of the Day generator
///
/// Picks a theme for today, asks a generative model for one fresh
/// conversation-starter question, records it and posts it to a channel.
#[derive(Parser, Debug)]
#[command(name = "qotd")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate, record and publish today's question
    Run {
        /// Generate and print the question without writing or publishing
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the theme and prompt that a run would use
    Theme {
        /// Date to resolve (YYYY-MM-DD, default: today)
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,
    },

    /// Show recorded questions, newest first
    History {
        /// Number of entries to show (default: 10)
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}
