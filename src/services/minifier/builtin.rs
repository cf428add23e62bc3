//! In-process minifier backed by the `minifier` crate.

use async_trait::async_trait;

use super::{Minifier, non_empty};
use crate::error::MinifyError;
use crate::models::Language;

/// Minifies CSS and JSON without spawning anything.
///
/// JavaScript goes through the command backend: `minifier::js` does not parse,
/// so it can join statements that rely on a newline to end them.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinMinifier;

impl BuiltinMinifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Minifier for BuiltinMinifier {
    fn name(&self) -> &str {
        "builtin"
    }

    fn supports(&self, language: Language) -> bool {
        matches!(language, Language::Css | Language::Json)
    }

    async fn minify(&self, source: &str, language: Language) -> Result<String, MinifyError> {
        let output = match language {
            Language::Css => minifier::css::minify(source)
                .map_err(|e| MinifyError::InvalidInput(e.to_string()))?
                .to_string(),
            Language::Json => {
                // The JSON minifier is lenient; reject input that would not parse.
                serde_json::from_str::<serde_json::Value>(source)
                    .map_err(|e| MinifyError::InvalidInput(format!("invalid JSON: {e}")))?;
                minifier::json::minify(source).to_string()
            }
            other => return Err(MinifyError::Unsupported(other)),
        };

        non_empty(&output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_javascript_not_offered() {
        let minifier = BuiltinMinifier::new();
        assert!(!minifier.supports(Language::JavaScript));

        for source in [
            "let a = 1\nlet b = 2\n",
            "return\nfoo()\n",
            "a\n++b\n",
        ] {
            let err = minifier
                .minify(source, Language::JavaScript)
                .await
                .unwrap_err();
            assert!(matches!(err, MinifyError::Unsupported(Language::JavaScript)));
        }
    }

    #[tokio::test]
    async fn test_minify_css() {
        let source = "body {\n  color: red;\n  margin: 0;\n}\n";
        let output = BuiltinMinifier::new()
            .minify(source, Language::Css)
            .await
            .unwrap();

        assert!(output.contains("color:red"));
        assert!(!output.contains('\n'));
    }

    #[tokio::test]
    async fn test_minify_json() {
        let source = "{\n  \"a\": 1,\n  \"b\": [1, 2, 3]\n}\n";
        let output = BuiltinMinifier::new()
            .minify(source, Language::Json)
            .await
            .unwrap();

        assert!(!output.contains(' '));
        let original: serde_json::Value = serde_json::from_str(source).unwrap();
        let minified: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(original, minified);
    }

    #[tokio::test]
    async fn test_invalid_json_rejected() {
        let err = BuiltinMinifier::new()
            .minify("{\"a\": ", Language::Json)
            .await
            .unwrap_err();
        assert!(matches!(err, MinifyError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_unsupported_language() {
        let minifier = BuiltinMinifier::new();
        assert!(!minifier.supports(Language::Python));

        let err = minifier
            .minify("print('hi')", Language::Python)
            .await
            .unwrap_err();
        assert!(matches!(err, MinifyError::Unsupported(Language::Python)));
    }
}
