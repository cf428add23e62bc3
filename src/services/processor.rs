//! Turns raw input into blocks: optional minification, fallback, then splitting.

use std::time::Duration;

use tracing::{debug, warn};

use super::minifier::{Minifier, create_minifier};
use super::splitter::BlockSplitter;
use crate::error::{MinifyError, ProcessError};
use crate::models::{Block, Config, Language, MinifyOutcome, SplitReport};

/// Stateless pipeline shared by the `split` and `minify` commands.
pub struct Processor {
    minifier: Box<dyn Minifier>,
    splitter: BlockSplitter,
    timeout: Option<Duration>,
}

impl Processor {
    pub fn new(minifier: Box<dyn Minifier>, splitter: BlockSplitter) -> Self {
        Self {
            minifier,
            splitter,
            timeout: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            create_minifier(&config.minify),
            BlockSplitter::from_config(&config.split),
        )
        .with_timeout(config.minify.timeout_secs.map(Duration::from_secs))
    }

    /// Bound each minifier call; `None` waits indefinitely.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_splitter(mut self, splitter: BlockSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    pub fn minifier(&self) -> &dyn Minifier {
        self.minifier.as_ref()
    }

    pub fn splitter(&self) -> &BlockSplitter {
        &self.splitter
    }

    /// Minify (when asked) and split `input`.
    ///
    /// Minifier failures never fail the call: the original text is split instead
    /// and the failure is recorded in the report.
    pub async fn process(
        &self,
        input: &str,
        language: Language,
        minify: bool,
    ) -> Result<SplitReport, ProcessError> {
        let (text, outcome) = self.prepare(input, language, minify).await?;

        let blocks = Block::from_texts(self.splitter.split(&text));
        debug!(
            blocks = blocks.len(),
            max_len = self.splitter.max_len(),
            policy = %self.splitter.policy(),
            "split text into blocks"
        );

        Ok(SplitReport::new(
            language,
            outcome,
            self.splitter.max_len(),
            text,
            blocks,
        ))
    }

    /// Validate `input` and pick the text to split, minified or original.
    pub async fn prepare(
        &self,
        input: &str,
        language: Language,
        minify: bool,
    ) -> Result<(String, MinifyOutcome), ProcessError> {
        if input.trim().is_empty() {
            return Err(ProcessError::EmptyInput);
        }

        if !minify || !language.is_code() {
            return Ok((input.to_string(), MinifyOutcome::Skipped));
        }

        match self.minify(input, language).await {
            Ok(minified) => {
                debug!(
                    minifier = self.minifier.name(),
                    %language,
                    before = input.len(),
                    after = minified.len(),
                    "minified input"
                );
                Ok((minified, MinifyOutcome::Applied))
            }
            Err(e) => {
                warn!(
                    minifier = self.minifier.name(),
                    %language,
                    error = %e,
                    "minification failed, using original text"
                );
                Ok((
                    input.to_string(),
                    MinifyOutcome::Failed {
                        reason: e.to_string(),
                    },
                ))
            }
        }
    }

    async fn minify(&self, input: &str, language: Language) -> Result<String, MinifyError> {
        if !self.minifier.supports(language) {
            return Err(MinifyError::Unsupported(language));
        }

        let minified = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.minifier.minify(input, language))
                .await
                .map_err(|_| MinifyError::Timeout(limit))??,
            None => self.minifier.minify(input, language).await?,
        };

        if minified.trim().is_empty() {
            return Err(MinifyError::EmptyOutput);
        }
        Ok(minified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use crate::models::TokenPolicy;
    use crate::services::minifier::BuiltinMinifier;

    /// Test double with a scripted result.
    struct FakeMinifier {
        result: fn(&str) -> Result<String, MinifyError>,
        delay: Option<Duration>,
        calls: Arc<AtomicU32>,
    }

    impl FakeMinifier {
        fn new(result: fn(&str) -> Result<String, MinifyError>) -> Self {
            Self {
                result,
                delay: None,
                calls: Arc::new(AtomicU32::new(0)),
            }
        }
    }

    #[async_trait]
    impl Minifier for FakeMinifier {
        fn name(&self) -> &str {
            "fake"
        }

        fn supports(&self, language: Language) -> bool {
            language != Language::Sql
        }

        async fn minify(&self, source: &str, _language: Language) -> Result<String, MinifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            (self.result)(source)
        }
    }

    fn squash(source: &str) -> Result<String, MinifyError> {
        Ok(source.split_whitespace().collect::<Vec<_>>().join(""))
    }

    fn fail(_: &str) -> Result<String, MinifyError> {
        Err(MinifyError::Process("SyntaxError".to_string()))
    }

    fn blank(_: &str) -> Result<String, MinifyError> {
        Ok("   ".to_string())
    }

    fn processor(minifier: FakeMinifier, max_len: usize) -> Processor {
        Processor::new(Box::new(minifier), BlockSplitter::new(max_len))
    }

    #[tokio::test]
    async fn test_empty_input_rejected() {
        let p = processor(FakeMinifier::new(squash), 10);
        assert!(matches!(
            p.process("", Language::JavaScript, true).await,
            Err(ProcessError::EmptyInput)
        ));
        assert!(matches!(
            p.process(" \n\t", Language::JavaScript, false).await,
            Err(ProcessError::EmptyInput)
        ));
    }

    #[tokio::test]
    async fn test_minified_text_is_split() {
        let p = processor(FakeMinifier::new(squash), 10);
        let report = p
            .process("let a = 1;\nlet b = 2;", Language::JavaScript, true)
            .await
            .unwrap();

        assert_eq!(report.minify, MinifyOutcome::Applied);
        assert_eq!(report.text, "leta=1;letb=2;");
        assert_eq!(report.block_count, 1);
        assert_eq!(report.blocks[0].content, "leta=1;letb=2;");
    }

    #[tokio::test]
    async fn test_minify_disabled_skips_minifier() {
        let fake = FakeMinifier::new(squash);
        let calls = fake.calls.clone();
        let p = processor(fake, 9);

        let report = p
            .process("aaaa bbbb cccc", Language::JavaScript, false)
            .await
            .unwrap();

        assert_eq!(report.minify, MinifyOutcome::Skipped);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let contents: Vec<_> = report.blocks.iter().map(|b| b.content.as_str()).collect();
        assert_eq!(contents, vec!["aaaa bbbb", "cccc"]);
    }

    #[tokio::test]
    async fn test_natural_language_never_minified() {
        let fake = FakeMinifier::new(squash);
        let calls = fake.calls.clone();
        let p = processor(fake, 100);

        let report = p
            .process("Hello there,   friend.", Language::NaturalLanguage, true)
            .await
            .unwrap();

        assert_eq!(report.minify, MinifyOutcome::Skipped);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(report.blocks[0].content, "Hello there, friend.");
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_original() {
        let p = processor(FakeMinifier::new(fail), 100);
        let report = p
            .process("let  broken =", Language::JavaScript, true)
            .await
            .unwrap();

        assert!(report.minify.is_failed());
        assert_eq!(report.text, "let  broken =");
        assert_eq!(report.blocks[0].content, "let broken =");
    }

    #[tokio::test]
    async fn test_blank_output_falls_back_to_original() {
        let p = processor(FakeMinifier::new(blank), 100);
        let report = p.process("let a = 1;", Language::JavaScript, true).await.unwrap();

        assert_eq!(
            report.minify,
            MinifyOutcome::Failed {
                reason: MinifyError::EmptyOutput.to_string()
            }
        );
        assert_eq!(report.text, "let a = 1;");
        assert_eq!(report.block_count, 1);
    }

    #[tokio::test]
    async fn test_unsupported_language_falls_back() {
        let fake = FakeMinifier::new(squash);
        let calls = fake.calls.clone();
        let p = processor(fake, 100);

        let report = p.process("SELECT 1;", Language::Sql, true).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        match report.minify {
            MinifyOutcome::Failed { reason } => assert!(reason.contains("SQL")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(report.blocks[0].content, "SELECT 1;");
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let mut fake = FakeMinifier::new(squash);
        fake.delay = Some(Duration::from_secs(5));
        let p = processor(fake, 100).with_timeout(Some(Duration::from_millis(20)));

        let report = p.process("let a = 1;", Language::JavaScript, true).await.unwrap();

        match report.minify {
            MinifyOutcome::Failed { reason } => assert!(reason.contains("timed out after 20ms")),
            other => panic!("expected timeout, got {other:?}"),
        }
        assert_eq!(report.text, "let a = 1;");
    }

    #[tokio::test]
    async fn test_splitter_policy_applies() {
        let splitter = BlockSplitter::new(5).with_policy(TokenPolicy::Preserve);
        let p = processor(FakeMinifier::new(squash), 100).with_splitter(splitter);

        let report = p.process("aa  bb", Language::NaturalLanguage, true).await.unwrap();
        let contents: Vec<_> = report.blocks.iter().map(|b| b.content.as_str()).collect();
        assert_eq!(contents, vec!["aa ", "bb"]);
        assert_eq!(report.max_len, 5);
    }

    #[tokio::test]
    async fn test_from_config_uses_builtin() {
        let mut config = Config::default();
        config.split.max_block_len = 20;
        let p = Processor::from_config(&config);

        assert_eq!(p.minifier().name(), BuiltinMinifier::new().name());
        assert_eq!(p.splitter().max_len(), 20);

        let report = p
            .process("{ \"a\": 1,\n  \"b\": 2 }", Language::Json, true)
            .await
            .unwrap();
        assert_eq!(report.minify, MinifyOutcome::Applied);
        assert_eq!(report.block_count, 1);
        assert!(!report.blocks[0].content.contains(' '));
    }

    #[tokio::test]
    async fn test_builtin_leaves_javascript_untouched() {
        let p = Processor::from_config(&Config::default());
        let source = "let a = 1\nlet b = 2\nconsole.log(a + b)\n";

        let report = p.process(source, Language::JavaScript, true).await.unwrap();

        assert!(report.minify.is_failed());
        assert_eq!(report.text, source);
        assert_ne!(report.blocks[0].content, "let a=1let b=2console.log(a+b)");
        assert_eq!(report.blocks[0].content, "let a = 1 let b = 2 console.log(a + b)");
    }
}
