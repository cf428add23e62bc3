use anyhow::Result;

use crate::cli::output::{LanguageInfo, LanguageListing, get_formatter};
use crate::models::{Config, Language, MinifyBackend, OutputFormat};
use crate::services::{CommandMinifier, create_minifier};

pub async fn handle_languages(format: OutputFormat, _verbose: bool) -> Result<()> {
    let config = Config::load()?.config;
    let formatter = get_formatter(format);

    let minifier = create_minifier(&config.minify);
    let (backend_available, install_hint) = match config.minify.backend {
        MinifyBackend::Builtin => (true, None),
        MinifyBackend::Command => {
            let command = CommandMinifier::from_config(&config.minify);
            (
                command.check_available(),
                Some(command.install_instructions()),
            )
        }
    };

    let listing = LanguageListing {
        backend: minifier.name().to_string(),
        backend_available,
        languages: Language::ALL
            .into_iter()
            .map(|language| LanguageInfo {
                language,
                minifiable: language.is_code() && minifier.supports(language),
            })
            .collect(),
    };

    print!("{}", formatter.format_languages(&listing));

    if !backend_available {
        eprintln!();
        eprintln!(
            "Warning: minifier `{}` not found; input will be split unminified.",
            listing.backend
        );
        if let Some(hint) = install_hint {
            eprintln!("      {hint}");
        }
    }
    if !config.minify.enabled {
        eprintln!("Hint: minification is disabled. Enable with: code2block split --minify");
    }

    Ok(())
}
