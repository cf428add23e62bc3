//! Minifier abstraction layer.
//!
//! Minification is an optional first step before splitting. Backends are picked
//! from configuration: the in-process `builtin` minifier, or an external
//! `command` such as terser that reads source on stdin.

mod builtin;
mod command;

pub use builtin::BuiltinMinifier;
pub use command::CommandMinifier;

use async_trait::async_trait;

use crate::error::MinifyError;
use crate::models::{Language, MinifyBackend, MinifyConfig};

/// Compacts source text while keeping its meaning.
///
/// A call is a single attempt: implementations do not retry, and a failure is
/// reported to the caller, which decides whether to fall back to the original.
#[async_trait]
pub trait Minifier: Send + Sync {
    /// Backend name for logs and listings.
    fn name(&self) -> &str;

    /// Whether this backend will try to minify `language`.
    fn supports(&self, language: Language) -> bool;

    /// Minify `source`, returning the compacted text.
    async fn minify(&self, source: &str, language: Language) -> Result<String, MinifyError>;
}

/// Create a minifier backend based on configuration.
pub fn create_minifier(config: &MinifyConfig) -> Box<dyn Minifier> {
    match config.backend {
        MinifyBackend::Builtin => Box::new(BuiltinMinifier::new()),
        MinifyBackend::Command => Box::new(CommandMinifier::from_config(config)),
    }
}

/// Trimmed minifier output, or `EmptyOutput` when nothing is left.
fn non_empty(output: &str) -> Result<String, MinifyError> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        Err(MinifyError::EmptyOutput)
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_minifier_follows_backend() {
        let mut config = MinifyConfig::default();
        assert_eq!(create_minifier(&config).name(), "builtin");

        config.backend = MinifyBackend::Command;
        config.program = "terser".to_string();
        assert_eq!(create_minifier(&config).name(), "terser");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  a=1 \n").unwrap(), "a=1");
        assert!(matches!(non_empty(" \n "), Err(MinifyError::EmptyOutput)));
    }
}
