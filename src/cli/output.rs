use std::fmt::Write as FmtWrite;
use std::path::PathBuf;

use console::style;

use crate::models::{Language, MinifyOutcome, OutputFormat, SplitReport};

pub trait Formatter {
    fn format_report(&self, report: &SplitReport) -> String;
    fn format_minified(&self, minified: &MinifiedText) -> String;
    fn format_languages(&self, listing: &LanguageListing) -> String;
    fn format_written(&self, files: &[PathBuf]) -> String;
    fn format_message(&self, message: &str) -> String;
    fn format_error(&self, error: &str) -> String;
}

/// Output of the `minify` command.
#[derive(Debug, Clone)]
pub struct MinifiedText {
    pub language: Language,
    pub outcome: MinifyOutcome,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct LanguageInfo {
    pub language: Language,
    pub minifiable: bool,
}

#[derive(Debug, Clone)]
pub struct LanguageListing {
    pub backend: String,
    pub backend_available: bool,
    pub languages: Vec<LanguageInfo>,
}

fn outcome_label(outcome: &MinifyOutcome) -> String {
    match outcome {
        MinifyOutcome::Applied => "applied".to_string(),
        MinifyOutcome::Skipped => "skipped".to_string(),
        MinifyOutcome::Failed { reason } => format!("failed ({})", reason),
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_report(&self, report: &SplitReport) -> String {
        if report.is_empty() {
            return "No blocks created.\n".to_string();
        }

        let mut output = String::new();
        writeln!(
            output,
            "{}",
            style(format!(
                "{} Block{} Created",
                report.block_count,
                plural(report.block_count)
            ))
            .bold()
        )
        .unwrap();
        writeln!(
            output,
            "Language: {} | Minify: {} | Max length: {} | Total: {} chars\n",
            report.language,
            outcome_label(&report.minify),
            report.max_len,
            report.total_chars
        )
        .unwrap();

        for block in &report.blocks {
            writeln!(
                output,
                "{} ({} chars)",
                style(format!("Block Code {}", block.number)).bold(),
                block.char_len
            )
            .unwrap();
            writeln!(output, "---").unwrap();
            writeln!(output, "{}", block.content).unwrap();
            writeln!(output).unwrap();
        }

        output
    }

    fn format_minified(&self, minified: &MinifiedText) -> String {
        format!("{}\n", minified.text)
    }

    fn format_languages(&self, listing: &LanguageListing) -> String {
        let mut output = String::new();
        writeln!(output, "Supported Languages").unwrap();
        writeln!(output, "-------------------").unwrap();

        let availability = if listing.backend_available {
            "available"
        } else {
            "not found"
        };
        writeln!(output, "Minifier: {} ({})\n", listing.backend, availability).unwrap();

        for info in &listing.languages {
            let status = if info.minifiable { "✓" } else { "✗" };
            writeln!(
                output,
                "  {} {:<18} {}",
                status,
                info.language.to_string(),
                info.language.slug()
            )
            .unwrap();
        }
        output
    }

    fn format_written(&self, files: &[PathBuf]) -> String {
        let mut output = String::new();
        writeln!(output, "Wrote {} block file{}", files.len(), plural(files.len())).unwrap();
        for file in files {
            writeln!(output, "  {}", file.display()).unwrap();
        }
        output
    }

    fn format_message(&self, message: &str) -> String {
        format!("{}\n", message)
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}\n", error)
    }
}

pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render(&self, value: &serde_json::Value) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e)) + "\n"
    }
}

impl Formatter for JsonFormatter {
    fn format_report(&self, report: &SplitReport) -> String {
        match serde_json::to_value(report) {
            Ok(value) => self.render(&value),
            Err(e) => self.format_error(&e.to_string()),
        }
    }

    fn format_minified(&self, minified: &MinifiedText) -> String {
        let json = serde_json::json!({
            "language": minified.language,
            "minify": minified.outcome,
            "text": minified.text,
        });
        self.render(&json)
    }

    fn format_languages(&self, listing: &LanguageListing) -> String {
        let languages: Vec<serde_json::Value> = listing
            .languages
            .iter()
            .map(|info| {
                serde_json::json!({
                    "id": info.language.slug(),
                    "name": info.language.to_string(),
                    "minifiable": info.minifiable,
                })
            })
            .collect();

        let json = serde_json::json!({
            "minifier": {
                "backend": listing.backend,
                "available": listing.backend_available,
            },
            "languages": languages,
        });
        self.render(&json)
    }

    fn format_written(&self, files: &[PathBuf]) -> String {
        let json = serde_json::json!({ "files": files });
        self.render(&json)
    }

    fn format_message(&self, message: &str) -> String {
        serde_json::json!({"message": message}).to_string() + "\n"
    }

    fn format_error(&self, error: &str) -> String {
        serde_json::json!({"error": error}).to_string() + "\n"
    }
}

pub struct MarkdownFormatter;

/// Code fence longer than any backtick run in `content`.
fn fence_for(content: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in content.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat(longest.max(2) + 1)
}

fn fence_lang(language: Language) -> &'static str {
    if language.is_code() {
        language.slug()
    } else {
        "text"
    }
}

impl Formatter for MarkdownFormatter {
    fn format_report(&self, report: &SplitReport) -> String {
        if report.is_empty() {
            return "## No blocks created\n".to_string();
        }

        let mut output = String::new();
        writeln!(
            output,
            "## {} Block{} Created\n",
            report.block_count,
            plural(report.block_count)
        )
        .unwrap();
        writeln!(output, "| Language | Minify | Max length | Total chars |").unwrap();
        writeln!(output, "|----------|--------|------------|-------------|").unwrap();
        writeln!(
            output,
            "| {} | {} | {} | {} |\n",
            report.language,
            outcome_label(&report.minify),
            report.max_len,
            report.total_chars
        )
        .unwrap();

        for block in &report.blocks {
            let fence = fence_for(&block.content);
            writeln!(output, "### Block Code {}\n", block.number).unwrap();
            writeln!(
                output,
                "*{} chars, sha256 `{}`*\n",
                block.char_len,
                &block.checksum[..12]
            )
            .unwrap();
            writeln!(output, "{}{}", fence, fence_lang(report.language)).unwrap();
            writeln!(output, "{}", block.content).unwrap();
            writeln!(output, "{}\n", fence).unwrap();
        }

        output
    }

    fn format_minified(&self, minified: &MinifiedText) -> String {
        let fence = fence_for(&minified.text);
        let mut output = String::new();
        writeln!(output, "## Minified Code\n").unwrap();
        writeln!(
            output,
            "**Language:** {} | **Minify:** {}\n",
            minified.language,
            outcome_label(&minified.outcome)
        )
        .unwrap();
        writeln!(output, "{}{}", fence, fence_lang(minified.language)).unwrap();
        writeln!(output, "{}", minified.text).unwrap();
        writeln!(output, "{}", fence).unwrap();
        output
    }

    fn format_languages(&self, listing: &LanguageListing) -> String {
        let mut output = String::new();
        writeln!(output, "## Supported Languages\n").unwrap();
        let availability = if listing.backend_available { "✅" } else { "❌" };
        writeln!(
            output,
            "**Minifier:** `{}` {}\n",
            listing.backend, availability
        )
        .unwrap();
        writeln!(output, "| Language | Id | Minify |").unwrap();
        writeln!(output, "|----------|----|--------|").unwrap();
        for info in &listing.languages {
            let status = if info.minifiable { "✅" } else { "❌" };
            writeln!(
                output,
                "| {} | `{}` | {} |",
                info.language,
                info.language.slug(),
                status
            )
            .unwrap();
        }
        output
    }

    fn format_written(&self, files: &[PathBuf]) -> String {
        let mut output = String::new();
        writeln!(output, "## Block Files\n").unwrap();
        for file in files {
            writeln!(output, "- `{}`", file.display()).unwrap();
        }
        output
    }

    fn format_message(&self, message: &str) -> String {
        format!("> {}\n", message)
    }

    fn format_error(&self, error: &str) -> String {
        format!("> ⚠️ **Error:** {}\n", error)
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter),
    }
}
