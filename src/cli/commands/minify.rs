//! Minify command implementation.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::split::resolve_language;
use crate::cli::output::{MinifiedText, get_formatter};
use crate::models::{Config, Language, MinifyOutcome, OutputFormat};
use crate::services::Processor;
use crate::utils::read_input;

/// Arguments for the minify command.
#[derive(Debug, Args)]
pub struct MinifyArgs {
    /// Input file (omit or use - for stdin)
    #[arg()]
    pub file: Option<PathBuf>,

    /// Input language; inferred from the file extension when omitted
    #[arg(long, short = 'l')]
    pub language: Option<Language>,

    /// Fail instead of printing the original text when minification fails
    #[arg(long)]
    pub strict: bool,
}

/// Handle the minify command.
pub async fn handle_minify(args: MinifyArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let config = Config::load()?.config;
    let formatter = get_formatter(format);

    let language = resolve_language(
        args.language,
        args.file.as_deref(),
        config.input.default_language,
    );
    let input = read_input(args.file.as_deref(), config.input.max_input_bytes)?;

    let processor = Processor::from_config(&config);
    if verbose {
        eprintln!(
            "Minifying {} chars of {language} with {}",
            input.chars().count(),
            processor.minifier().name()
        );
    }

    let (text, outcome) = processor.prepare(&input, language, true).await?;

    if args.strict
        && let MinifyOutcome::Failed { reason } = &outcome
    {
        anyhow::bail!("minification failed: {reason}");
    }

    print!(
        "{}",
        formatter.format_minified(&MinifiedText {
            language,
            outcome,
            text,
        })
    );

    Ok(())
}
