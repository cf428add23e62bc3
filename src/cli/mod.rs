//! CLI module for code2block.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use crate::models::OutputFormat;

/// Minify code or text and split it into fixed-size blocks for size-limited prompts.
#[derive(Debug, Parser)]
#[command(name = "code2block")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(
        long,
        short = 'f',
        global = true,
        help = "Output format: text, json, or markdown"
    )]
    pub format: Option<OutputFormat>,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Split input into blocks, minifying it first if enabled
    Split(commands::SplitArgs),

    /// Minify input and print the result without splitting
    Minify(commands::MinifyArgs),

    /// List supported languages and minifier coverage
    Languages,

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::ConfigCommand),
}
