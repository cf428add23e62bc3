//! Input-language tags.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Language of the input text, used to pick a minification strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "javascript")]
    JavaScript,
    #[serde(rename = "typescript")]
    TypeScript,
    #[serde(rename = "css")]
    Css,
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "html")]
    Html,
    #[serde(rename = "python")]
    Python,
    #[serde(rename = "rust")]
    Rust,
    #[serde(rename = "go")]
    Go,
    #[serde(rename = "java")]
    Java,
    #[serde(rename = "c")]
    C,
    #[serde(rename = "cpp")]
    Cpp,
    #[serde(rename = "csharp")]
    CSharp,
    #[serde(rename = "php")]
    Php,
    #[serde(rename = "ruby")]
    Ruby,
    #[serde(rename = "shell")]
    Shell,
    #[serde(rename = "sql")]
    Sql,
    #[serde(rename = "natural")]
    NaturalLanguage,
}

impl Language {
    /// Every supported language, in display order.
    pub const ALL: [Language; 17] = [
        Language::JavaScript,
        Language::TypeScript,
        Language::Css,
        Language::Json,
        Language::Html,
        Language::Python,
        Language::Rust,
        Language::Go,
        Language::Java,
        Language::C,
        Language::Cpp,
        Language::CSharp,
        Language::Php,
        Language::Ruby,
        Language::Shell,
        Language::Sql,
        Language::NaturalLanguage,
    ];

    /// Short machine-friendly identifier, matching the serde representation.
    pub fn slug(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Css => "css",
            Language::Json => "json",
            Language::Html => "html",
            Language::Python => "python",
            Language::Rust => "rust",
            Language::Go => "go",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Php => "php",
            Language::Ruby => "ruby",
            Language::Shell => "shell",
            Language::Sql => "sql",
            Language::NaturalLanguage => "natural",
        }
    }

    /// Whether the text is source code rather than prose.
    pub fn is_code(&self) -> bool {
        !matches!(self, Language::NaturalLanguage)
    }

    /// Guess the language from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let lang = match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" | "jsx" => Language::JavaScript,
            "ts" | "mts" | "cts" | "tsx" => Language::TypeScript,
            "css" => Language::Css,
            "json" => Language::Json,
            "html" | "htm" => Language::Html,
            "py" => Language::Python,
            "rs" => Language::Rust,
            "go" => Language::Go,
            "java" => Language::Java,
            "c" | "h" => Language::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" => Language::Cpp,
            "cs" => Language::CSharp,
            "php" => Language::Php,
            "rb" => Language::Ruby,
            "sh" | "bash" | "zsh" => Language::Shell,
            "sql" => Language::Sql,
            "txt" | "md" | "markdown" | "rst" => Language::NaturalLanguage,
            _ => return None,
        };
        Some(lang)
    }

    /// Guess the language from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let lang = match normalized.as_str() {
            "javascript" | "js" => Language::JavaScript,
            "typescript" | "ts" => Language::TypeScript,
            "css" => Language::Css,
            "json" => Language::Json,
            "html" => Language::Html,
            "python" | "py" => Language::Python,
            "rust" | "rs" => Language::Rust,
            "go" | "golang" => Language::Go,
            "java" => Language::Java,
            "c" => Language::C,
            "cpp" | "c++" => Language::Cpp,
            "csharp" | "c#" | "cs" => Language::CSharp,
            "php" => Language::Php,
            "ruby" | "rb" => Language::Ruby,
            "shell" | "sh" | "bash" => Language::Shell,
            "sql" => Language::Sql,
            "natural" | "natural language" | "natural-language" | "text" | "md" => {
                Language::NaturalLanguage
            }
            _ => return Err(format!("unknown language: {}", s)),
        };
        Ok(lang)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Css => "CSS",
            Language::Json => "JSON",
            Language::Html => "HTML",
            Language::Python => "Python",
            Language::Rust => "Rust",
            Language::Go => "Go",
            Language::Java => "Java",
            Language::C => "C",
            Language::Cpp => "C++",
            Language::CSharp => "C#",
            Language::Php => "PHP",
            Language::Ruby => "Ruby",
            Language::Shell => "Shell",
            Language::Sql => "SQL",
            Language::NaturalLanguage => "Natural Language",
        };
        write!(f, "{}", name)
    }
}
