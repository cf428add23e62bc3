use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::output::{Formatter, get_formatter};
use crate::models::{Config, Language, MinifyOutcome, OutputFormat, SplitReport, TokenPolicy};
use crate::services::Processor;
use crate::utils::{preview, read_input, write_blocks};

#[derive(Debug, Args)]
pub struct SplitArgs {
    #[arg(help = "Input file (omit or use - for stdin)")]
    pub file: Option<PathBuf>,

    #[arg(
        long,
        short = 'l',
        help = "Input language (e.g., javascript, css, natural); inferred from the file extension"
    )]
    pub language: Option<Language>,

    #[arg(
        long,
        short = 'm',
        value_parser = parse_max_len,
        help = "Maximum block length in characters"
    )]
    pub max_len: Option<usize>,

    #[arg(long, conflicts_with = "no_minify", help = "Minify before splitting")]
    pub minify: bool,

    #[arg(long, help = "Split the original text without minifying")]
    pub no_minify: bool,

    #[arg(long, help = "Whitespace handling: collapse or preserve")]
    pub policy: Option<TokenPolicy>,

    #[arg(
        long,
        short = 'b',
        conflicts_with = "output_dir",
        help = "Print only block N (1-based), raw"
    )]
    pub block: Option<usize>,

    #[arg(long, short = 'o', help = "Write each block to DIR/block-NNN.txt")]
    pub output_dir: Option<PathBuf>,
}

fn parse_max_len(value: &str) -> Result<usize, String> {
    let len: usize = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if len == 0 {
        return Err("max length must be at least 1".to_string());
    }
    Ok(len)
}

/// Explicit flag, then file extension, then the configured default.
pub(crate) fn resolve_language(
    explicit: Option<Language>,
    file: Option<&Path>,
    default: Language,
) -> Language {
    explicit
        .or_else(|| file.and_then(Language::from_path))
        .unwrap_or(default)
}

/// `--minify` / `--no-minify` override the configured setting.
pub(crate) fn resolve_minify(minify: bool, no_minify: bool, configured: bool) -> bool {
    if minify {
        true
    } else if no_minify {
        false
    } else {
        configured
    }
}

pub async fn handle_split(args: SplitArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let mut config = Config::load()?.config;
    let formatter = get_formatter(format);
    let start_time = Instant::now();

    if let Some(max_len) = args.max_len {
        config.split.max_block_len = max_len;
    }
    if let Some(policy) = args.policy {
        config.split.policy = policy;
    }

    let language = resolve_language(
        args.language,
        args.file.as_deref(),
        config.input.default_language,
    );
    let minify = resolve_minify(args.minify, args.no_minify, config.minify.enabled);

    let input = read_input(args.file.as_deref(), config.input.max_input_bytes)
        .context("failed to read input")?;

    if verbose {
        eprintln!("Input: {} chars", input.chars().count());
        eprintln!("  Language: {language}");
        eprintln!("  Minify: {minify} ({})", config.minify.backend);
        eprintln!("  Max length: {}", config.split.max_block_len);
        eprintln!("  Policy: {}", config.split.policy);
    }

    let processor = Processor::from_config(&config);
    let report = processor.process(&input, language, minify).await?;

    if verbose {
        eprintln!("Timing: {}ms", start_time.elapsed().as_millis());
        eprintln!();
    }

    if let MinifyOutcome::Failed { reason } = &report.minify {
        eprintln!("Note: minification unavailable ({reason}); blocks use the original text.");
    }
    for block in report.oversized_blocks() {
        eprintln!(
            "Warning: block {} is {} chars, a single word longer than {}: {}",
            block.number,
            block.char_len,
            report.max_len,
            preview(&block.content, 40)
        );
    }

    let output = render_output(
        &report,
        args.block,
        args.output_dir.as_deref(),
        formatter.as_ref(),
    )?;
    print!("{output}");

    Ok(())
}

/// Raw block `N`, files written under `output_dir`, or the full formatted report.
fn render_output(
    report: &SplitReport,
    block: Option<usize>,
    output_dir: Option<&Path>,
    formatter: &dyn Formatter,
) -> Result<String> {
    if let Some(number) = block {
        let block = report.block(number).ok_or_else(|| {
            anyhow::anyhow!(
                "block {} does not exist ({} block{} created)",
                number,
                report.block_count,
                if report.block_count == 1 { "" } else { "s" }
            )
        })?;
        return Ok(block.content.clone());
    }

    if let Some(dir) = output_dir {
        let files = write_blocks(dir, &report.blocks)
            .with_context(|| format!("failed to write blocks to {}", dir.display()))?;
        return Ok(formatter.format_written(&files));
    }

    Ok(formatter.format_report(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::output::{JsonFormatter, TextFormatter};
    use crate::models::Block;

    fn two_block_report() -> SplitReport {
        SplitReport::new(
            Language::NaturalLanguage,
            MinifyOutcome::Skipped,
            9,
            "aaaa bbbb cccc".to_string(),
            Block::from_texts(vec!["aaaa bbbb".to_string(), "cccc".to_string()]),
        )
    }

    #[test]
    fn test_render_single_block_is_raw() {
        let output = render_output(&two_block_report(), Some(2), None, &TextFormatter).unwrap();
        assert_eq!(output, "cccc");

        let output = render_output(&two_block_report(), Some(1), None, &TextFormatter).unwrap();
        assert_eq!(output, "aaaa bbbb");
    }

    #[test]
    fn test_render_block_out_of_range() {
        let report = two_block_report();

        let err = render_output(&report, Some(0), None, &TextFormatter).unwrap_err();
        assert!(err.to_string().contains("block 0 does not exist"));

        let err = render_output(&report, Some(3), None, &TextFormatter).unwrap_err();
        assert_eq!(
            err.to_string(),
            "block 3 does not exist (2 blocks created)"
        );
    }

    #[test]
    fn test_render_block_out_of_range_singular() {
        let report = SplitReport::new(
            Language::NaturalLanguage,
            MinifyOutcome::Skipped,
            10,
            "one".to_string(),
            Block::from_texts(vec!["one".to_string()]),
        );
        let err = render_output(&report, Some(2), None, &TextFormatter).unwrap_err();
        assert!(err.to_string().contains("(1 block created)"));
    }

    #[test]
    fn test_render_output_dir_writes_and_summarises() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("blocks");

        let output =
            render_output(&two_block_report(), None, Some(&out), &TextFormatter).unwrap();

        assert!(output.contains("Wrote 2 block files"));
        assert_eq!(
            std::fs::read_to_string(out.join("block-001.txt")).unwrap(),
            "aaaa bbbb"
        );
        assert_eq!(
            std::fs::read_to_string(out.join("block-002.txt")).unwrap(),
            "cccc"
        );
    }

    #[test]
    fn test_render_full_report() {
        let output =
            render_output(&two_block_report(), None, None, &JsonFormatter::new(false)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["block_count"], 2);
        assert_eq!(json["blocks"][0]["content"], "aaaa bbbb");
    }

    #[test]
    fn test_parse_max_len() {
        assert_eq!(parse_max_len("6000").unwrap(), 6000);
        assert!(parse_max_len("0").is_err());
        assert!(parse_max_len("-3").is_err());
        assert!(parse_max_len("abc").is_err());
    }

    #[test]
    fn test_resolve_language_precedence() {
        let file = Path::new("style.css");
        assert_eq!(
            resolve_language(Some(Language::Json), Some(file), Language::Rust),
            Language::Json
        );
        assert_eq!(
            resolve_language(None, Some(file), Language::Rust),
            Language::Css
        );
        assert_eq!(
            resolve_language(None, Some(Path::new("-")), Language::Rust),
            Language::Rust
        );
        assert_eq!(resolve_language(None, None, Language::Go), Language::Go);
    }

    #[test]
    fn test_resolve_minify() {
        assert!(resolve_minify(true, false, false));
        assert!(!resolve_minify(false, true, true));
        assert!(resolve_minify(false, false, true));
        assert!(!resolve_minify(false, false, false));
    }
}
