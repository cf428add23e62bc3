//! Minifier that delegates to an external program (terser by default).

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{Minifier, non_empty};
use crate::error::MinifyError;
use crate::models::{Language, MinifyConfig};

/// Runs `program args...`, feeding source on stdin and reading the result from stdout.
#[derive(Debug, Clone)]
pub struct CommandMinifier {
    program: String,
    args: Vec<String>,
    languages: Vec<Language>,
}

impl CommandMinifier {
    pub fn new(program: impl Into<String>, args: Vec<String>, languages: Vec<Language>) -> Self {
        Self {
            program: program.into(),
            args,
            languages,
        }
    }

    pub fn from_config(config: &MinifyConfig) -> Self {
        Self::new(
            config.program.clone(),
            config.args.clone(),
            config.languages.clone(),
        )
    }

    /// Check if the program can be found on `PATH`.
    pub fn check_available(&self) -> bool {
        std::process::Command::new("which")
            .arg(&self.program)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    pub fn install_instructions(&self) -> String {
        if self.program == "terser" {
            "Install terser: npm install -g terser".to_string()
        } else {
            format!("Make sure `{}` is installed and on PATH", self.program)
        }
    }
}

#[async_trait]
impl Minifier for CommandMinifier {
    fn name(&self) -> &str {
        &self.program
    }

    fn supports(&self, language: Language) -> bool {
        self.languages.contains(&language)
    }

    async fn minify(&self, source: &str, language: Language) -> Result<String, MinifyError> {
        if !self.supports(language) {
            return Err(MinifyError::Unsupported(language));
        }

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => MinifyError::NotFound(format!(
                    "{}. {}",
                    self.program,
                    self.install_instructions()
                )),
                _ => MinifyError::Io(e),
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| MinifyError::Process("failed to open minifier stdin".to_string()))?;

        // Write and read concurrently so a large input cannot fill both pipes.
        let write = async move {
            stdin.write_all(source.as_bytes()).await?;
            stdin.shutdown().await
        };
        let (write_result, output) = tokio::join!(write, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MinifyError::Process(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        write_result?;

        let stdout = String::from_utf8(output.stdout).map_err(|_| {
            MinifyError::Process(format!("{} produced non-UTF-8 output", self.program))
        })?;

        non_empty(&stdout)
    }
}
