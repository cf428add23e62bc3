use anyhow::{Context, Result};
use clap::Subcommand;
use std::process::Command;

use crate::cli::output::{Formatter, get_formatter};
use crate::models::{Config, ConfigSource, OutputFormat, ResolvedConfig};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    #[command(about = "Initialize configuration file")]
    Init {
        #[arg(
            long,
            short = 'g',
            help = "Create global config instead of project config"
        )]
        global: bool,
        #[arg(long, help = "Force overwrite existing config")]
        force: bool,
    },
    #[command(about = "Show current configuration")]
    Show {
        #[arg(long, help = "Show source of each configuration value")]
        source: bool,
    },
    #[command(about = "Show configuration file paths")]
    Path {
        #[arg(long, help = "Show all possible config paths")]
        all: bool,
    },
    #[command(about = "Edit configuration file")]
    Edit {
        #[arg(
            long,
            short = 'g',
            help = "Edit global config instead of project config"
        )]
        global: bool,
    },
}

pub async fn handle_config(cmd: ConfigCommand, format: OutputFormat, _verbose: bool) -> Result<()> {
    let formatter = get_formatter(format);

    match cmd {
        ConfigCommand::Init { global, force } => handle_init(global, force, formatter.as_ref()),
        ConfigCommand::Show { source } => handle_show(source, format),
        ConfigCommand::Path { all } => handle_path(all),
        ConfigCommand::Edit { global } => handle_edit(global, formatter.as_ref()),
    }
}

fn handle_init(global: bool, force: bool, formatter: &dyn Formatter) -> Result<()> {
    let (config_path, label) = if global {
        let path = Config::global_path()
            .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;
        (path, "global")
    } else {
        let dir = Config::project_config_dir()
            .ok_or_else(|| anyhow::anyhow!("could not determine project directory"))?;
        (dir.join("config.toml"), "project")
    };

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} config already exists at: {}\nUse --force to overwrite.",
            label,
            config_path.display()
        );
    }

    let path = if global {
        Config::init_global()
    } else {
        Config::init_project()
    }
    .with_context(|| format!("failed to create {label} config"))?;

    print!(
        "{}",
        formatter.format_message(&format!("Created {} config at: {}", label, path.display()))
    );

    Ok(())
}

fn handle_show(show_source: bool, format: OutputFormat) -> Result<()> {
    let resolved = Config::load()?;

    if format == OutputFormat::Json {
        let output = resolved_config_json(&resolved, show_source)?;
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if let Some(ref path) = resolved.project_path {
        println!("# Project config: {}", path.display());
    }
    if let Some(ref path) = resolved.global_path {
        println!("# Global config: {}", path.display());
    }
    println!();

    print!("{}", render_resolved_config(&resolved, show_source));

    Ok(())
}

fn resolved_config_json(
    resolved: &ResolvedConfig,
    show_source: bool,
) -> serde_json::Result<serde_json::Value> {
    if show_source {
        Ok(serde_json::json!({
            "config": resolved.config,
            "sources": resolved.sources,
            "project_path": resolved.project_path,
            "global_path": resolved.global_path,
        }))
    } else {
        serde_json::to_value(&resolved.config)
    }
}

fn render_resolved_config(resolved: &ResolvedConfig, show_source: bool) -> String {
    let config = &resolved.config;
    let sources = &resolved.sources;
    let src = |s: &ConfigSource| {
        if show_source {
            format!("  # {}", format_source(s))
        } else {
            String::new()
        }
    };
    let list = |items: Vec<String>| {
        let quoted: Vec<String> = items.iter().map(|i| format!("\"{i}\"")).collect();
        format!("[{}]", quoted.join(", "))
    };

    let mut out = String::new();
    let mut line = |s: String| {
        out.push_str(&s);
        out.push('\n');
    };

    line("[split]".into());
    line(format!(
        "max_block_len = {}{}",
        config.split.max_block_len,
        src(&sources.split_max_block_len)
    ));
    line(format!(
        "policy = \"{}\"{}",
        config.split.policy,
        src(&sources.split_policy)
    ));
    line(String::new());

    line("[minify]".into());
    line(format!(
        "enabled = {}{}",
        config.minify.enabled,
        src(&sources.minify_enabled)
    ));
    line(format!(
        "backend = \"{}\"{}",
        config.minify.backend,
        src(&sources.minify_backend)
    ));
    line(format!(
        "program = \"{}\"{}",
        config.minify.program,
        src(&sources.minify_program)
    ));
    line(format!(
        "args = {}{}",
        list(config.minify.args.clone()),
        src(&sources.minify_args)
    ));
    line(format!(
        "languages = {}{}",
        list(
            config
                .minify
                .languages
                .iter()
                .map(|l| l.slug().to_string())
                .collect()
        ),
        src(&sources.minify_languages)
    ));
    if let Some(secs) = config.minify.timeout_secs {
        line(format!(
            "timeout_secs = {}{}",
            secs,
            src(&sources.minify_timeout_secs)
        ));
    }
    line(String::new());

    line("[input]".into());
    line(format!(
        "default_language = \"{}\"{}",
        config.input.default_language.slug(),
        src(&sources.input_default_language)
    ));
    line(format!(
        "max_input_bytes = {}{}",
        config.input.max_input_bytes,
        src(&sources.input_max_input_bytes)
    ));
    line(String::new());

    line("[output]".into());
    line(format!(
        "default_format = \"{}\"{}",
        config.output.default_format,
        src(&sources.output_default_format)
    ));

    out
}

fn format_source(source: &ConfigSource) -> &'static str {
    match source {
        ConfigSource::Default => "default",
        ConfigSource::Global => "global",
        ConfigSource::Project => "project",
        ConfigSource::Env => "env",
    }
}

fn handle_path(show_all: bool) -> Result<()> {
    let project_path = Config::find_project_config();
    let global_path = Config::global_path();

    println!("Configuration paths:");
    println!();

    if let Some(ref path) = project_path {
        println!("Project config (active): {}", path.display());
    } else if show_all && let Some(dir) = Config::project_config_dir() {
        println!(
            "Project config (would be): {}",
            dir.join("config.toml").display()
        );
    }

    if let Some(ref path) = global_path {
        if path.exists() {
            println!("Global config (active): {}", path.display());
        } else if show_all {
            println!("Global config (would be): {}", path.display());
        }
    }

    if show_all && let Ok(cwd) = std::env::current_dir() {
        let env_path = cwd.join(".env");
        if env_path.exists() {
            println!(".env file (active): {}", env_path.display());
        } else {
            println!(".env file (would be): {}", env_path.display());
        }
    }

    Ok(())
}

fn handle_edit(global: bool, formatter: &dyn Formatter) -> Result<()> {
    let config_path = if global {
        let path = Config::global_path()
            .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;

        if !path.exists() {
            Config::init_global().context("failed to create global config")?;
            print!(
                "{}",
                formatter.format_message(&format!("Created global config at: {}", path.display()))
            );
        }
        path
    } else {
        let path = Config::find_project_config()
            .or_else(|| Config::project_config_dir().map(|d| d.join("config.toml")))
            .ok_or_else(|| anyhow::anyhow!("could not determine config path"))?;

        if !path.exists() {
            Config::init_project().context("failed to create project config")?;
            print!(
                "{}",
                formatter.format_message(&format!("Created project config at: {}", path.display()))
            );
        }
        path
    };

    let editor = std::env::var("EDITOR")
        .unwrap_or_else(|_| std::env::var("VISUAL").unwrap_or_else(|_| "vim".into()));

    Command::new(&editor)
        .arg(&config_path)
        .status()
        .with_context(|| format!("failed to open editor: {}", editor))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TokenPolicy;

    #[test]
    fn test_render_resolved_config_is_valid_toml() {
        let resolved = ResolvedConfig::default();
        let rendered = render_resolved_config(&resolved, false);

        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.split.max_block_len, resolved.config.split.max_block_len);
        assert_eq!(parsed.minify.args, resolved.config.minify.args);
        assert_eq!(parsed.minify.languages, resolved.config.minify.languages);
    }

    #[test]
    fn test_render_resolved_config_sources() {
        let mut resolved = ResolvedConfig::default();
        resolved.config.split.policy = TokenPolicy::Preserve;
        resolved.sources.split_policy = ConfigSource::Env;

        let rendered = render_resolved_config(&resolved, true);
        assert!(rendered.contains("policy = \"preserve\"  # env"));
        assert!(rendered.contains("max_block_len = 6000  # default"));
    }

    #[test]
    fn test_json_show_includes_sources() {
        let mut resolved = ResolvedConfig::default();
        resolved.sources.split_max_block_len = ConfigSource::Project;
        resolved.sources.minify_enabled = ConfigSource::Env;

        let json = resolved_config_json(&resolved, true).unwrap();
        assert_eq!(json["sources"]["split_max_block_len"], "project");
        assert_eq!(json["sources"]["minify_enabled"], "env");
        assert_eq!(json["sources"]["output_default_format"], "default");
        assert_eq!(json["config"]["split"]["max_block_len"], 6000);

        let plain = resolved_config_json(&resolved, false).unwrap();
        assert!(plain.get("sources").is_none());
        assert_eq!(plain["split"]["max_block_len"], 6000);
    }
}
