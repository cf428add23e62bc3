use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::block::TokenPolicy;
use super::format::OutputFormat;
use super::language::Language;
use crate::error::ConfigError;

pub const DEFAULT_MAX_BLOCK_LEN: usize = 6000;
pub const DEFAULT_MINIFY_PROGRAM: &str = "terser";
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 1024 * 1024;

const CONFIG_DIR_NAME: &str = "code2block";
const PROJECT_DIR_NAME: &str = ".code2block";
const CONFIG_FILE_NAME: &str = "config.toml";

pub const ENV_MAX_BLOCK_LEN: &str = "CODE2BLOCK_MAX_BLOCK_LEN";
pub const ENV_POLICY: &str = "CODE2BLOCK_POLICY";
pub const ENV_MINIFY: &str = "CODE2BLOCK_MINIFY";
pub const ENV_MINIFY_BACKEND: &str = "CODE2BLOCK_MINIFY_BACKEND";
pub const ENV_LANGUAGE: &str = "CODE2BLOCK_LANGUAGE";
pub const ENV_FORMAT: &str = "CODE2BLOCK_FORMAT";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub split: SplitConfig,

    #[serde(default)]
    pub minify: MinifyConfig,

    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    #[serde(default = "default_max_block_len")]
    pub max_block_len: usize,

    #[serde(default)]
    pub policy: TokenPolicy,
}

fn default_max_block_len() -> usize {
    DEFAULT_MAX_BLOCK_LEN
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            max_block_len: default_max_block_len(),
            policy: TokenPolicy::default(),
        }
    }
}

/// Which minifier implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinifyBackend {
    /// In-process minification (JavaScript, CSS, JSON)
    #[default]
    Builtin,
    /// External program reading stdin and writing stdout
    Command,
}

impl std::str::FromStr for MinifyBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "builtin" => Ok(MinifyBackend::Builtin),
            "command" | "cmd" => Ok(MinifyBackend::Command),
            _ => Err(format!("unknown minify backend: {}", s)),
        }
    }
}

impl std::fmt::Display for MinifyBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MinifyBackend::Builtin => write!(f, "builtin"),
            MinifyBackend::Command => write!(f, "command"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinifyConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub backend: MinifyBackend,

    /// Program run by the command backend
    #[serde(default = "default_program")]
    pub program: String,

    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Languages the command backend is offered
    #[serde(default = "default_command_languages")]
    pub languages: Vec<Language>,

    /// No timeout when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_true() -> bool {
    true
}

fn default_program() -> String {
    DEFAULT_MINIFY_PROGRAM.to_string()
}

fn default_args() -> Vec<String> {
    vec!["--module".to_string(), "--toplevel".to_string()]
}

fn default_command_languages() -> Vec<Language> {
    vec![Language::JavaScript, Language::TypeScript]
}

impl Default for MinifyConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            backend: MinifyBackend::default(),
            program: default_program(),
            args: default_args(),
            languages: default_command_languages(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub default_language: Language,

    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: u64,
}

fn default_max_input_bytes() -> u64 {
    DEFAULT_MAX_INPUT_BYTES
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            default_language: Language::default(),
            max_input_bytes: default_max_input_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub default_format: OutputFormat,
}

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    #[default]
    Default,
    Global,
    Project,
    Env,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    pub split_max_block_len: ConfigSource,
    pub split_policy: ConfigSource,
    pub minify_enabled: ConfigSource,
    pub minify_backend: ConfigSource,
    pub minify_program: ConfigSource,
    pub minify_args: ConfigSource,
    pub minify_languages: ConfigSource,
    pub minify_timeout_secs: ConfigSource,
    pub input_default_language: ConfigSource,
    pub input_max_input_bytes: ConfigSource,
    pub output_default_format: ConfigSource,
}

/// Effective configuration plus the files it was read from.
#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    pub config: Config,
    pub sources: ConfigSources,
    pub project_path: Option<PathBuf>,
    pub global_path: Option<PathBuf>,
}

// Partial layers: every field optional so a file only overrides what it names.

#[derive(Debug, Default, Deserialize)]
struct ConfigLayer {
    #[serde(default)]
    split: SplitLayer,
    #[serde(default)]
    minify: MinifyLayer,
    #[serde(default)]
    input: InputLayer,
    #[serde(default)]
    output: OutputLayer,
}

#[derive(Debug, Default, Deserialize)]
struct SplitLayer {
    max_block_len: Option<usize>,
    policy: Option<TokenPolicy>,
}

#[derive(Debug, Default, Deserialize)]
struct MinifyLayer {
    enabled: Option<bool>,
    backend: Option<MinifyBackend>,
    program: Option<String>,
    args: Option<Vec<String>>,
    languages: Option<Vec<Language>>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct InputLayer {
    default_language: Option<Language>,
    max_input_bytes: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct OutputLayer {
    default_format: Option<OutputFormat>,
}

macro_rules! merge {
    ($target:expr, $source_slot:expr, $value:expr, $source:expr) => {
        if let Some(v) = $value {
            $target = v;
            $source_slot = $source;
        }
    };
}

impl Config {
    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn project_config_dir() -> Option<PathBuf> {
        std::env::current_dir()
            .ok()
            .map(|cwd| cwd.join(PROJECT_DIR_NAME))
    }

    /// Nearest project config, walking up from the current directory.
    pub fn find_project_config() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        Self::find_project_config_from(&cwd)
    }

    pub fn find_project_config_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(PROJECT_DIR_NAME).join(CONFIG_FILE_NAME))
            .find(|path| path.is_file())
    }

    /// Load `.env`, then resolve defaults, global file, project file and environment.
    pub fn load() -> Result<ResolvedConfig, ConfigError> {
        dotenvy::dotenv().ok();

        let global = Self::global_path().filter(|p| p.is_file());
        let project = Self::find_project_config();

        Self::resolve(global.as_deref(), project.as_deref(), |key| {
            std::env::var(key).ok()
        })
    }

    pub fn resolve<F>(
        global: Option<&Path>,
        project: Option<&Path>,
        env: F,
    ) -> Result<ResolvedConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut resolved = ResolvedConfig::default();

        if let Some(path) = global {
            resolved.apply_layer(read_layer(path)?, ConfigSource::Global);
            resolved.global_path = Some(path.to_path_buf());
        }
        if let Some(path) = project {
            resolved.apply_layer(read_layer(path)?, ConfigSource::Project);
            resolved.project_path = Some(path.to_path_buf());
        }
        resolved.apply_layer(env_layer(&env)?, ConfigSource::Env);

        resolved.config.validate()?;
        Ok(resolved)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.split.max_block_len == 0 {
            return Err(ConfigError::ValidationError(
                "split.max_block_len must be at least 1".to_string(),
            ));
        }
        if self.input.max_input_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "input.max_input_bytes must be at least 1".to_string(),
            ));
        }
        if self.minify.backend == MinifyBackend::Command && self.minify.program.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "minify.program must be set for the command backend".to_string(),
            ));
        }
        if self.minify.timeout_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "minify.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn init_global() -> Result<PathBuf, ConfigError> {
        let path = Self::global_path().ok_or_else(|| {
            ConfigError::PathError("could not determine config directory".to_string())
        })?;
        Self::default().save_to(&path)?;
        Ok(path)
    }

    pub fn init_project() -> Result<PathBuf, ConfigError> {
        let dir = Self::project_config_dir().ok_or_else(|| {
            ConfigError::PathError("could not determine project directory".to_string())
        })?;
        let path = dir.join(CONFIG_FILE_NAME);
        Self::default().save_to(&path)?;
        Ok(path)
    }
}

impl ResolvedConfig {
    fn apply_layer(&mut self, layer: ConfigLayer, source: ConfigSource) {
        let c = &mut self.config;
        let s = &mut self.sources;

        merge!(c.split.max_block_len, s.split_max_block_len, layer.split.max_block_len, source);
        merge!(c.split.policy, s.split_policy, layer.split.policy, source);

        merge!(c.minify.enabled, s.minify_enabled, layer.minify.enabled, source);
        merge!(c.minify.backend, s.minify_backend, layer.minify.backend, source);
        merge!(c.minify.program, s.minify_program, layer.minify.program, source);
        merge!(c.minify.args, s.minify_args, layer.minify.args, source);
        merge!(c.minify.languages, s.minify_languages, layer.minify.languages, source);
        if let Some(secs) = layer.minify.timeout_secs {
            c.minify.timeout_secs = Some(secs);
            s.minify_timeout_secs = source;
        }

        merge!(
            c.input.default_language,
            s.input_default_language,
            layer.input.default_language,
            source
        );
        merge!(
            c.input.max_input_bytes,
            s.input_max_input_bytes,
            layer.input.max_input_bytes,
            source
        );

        merge!(
            c.output.default_format,
            s.output_default_format,
            layer.output.default_format,
            source
        );
    }
}

fn read_layer(path: &Path) -> Result<ConfigLayer, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

fn env_layer<F>(env: &F) -> Result<ConfigLayer, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut layer = ConfigLayer::default();

    layer.split.max_block_len = env_parse(env, ENV_MAX_BLOCK_LEN, |v| {
        v.parse::<usize>().map_err(|e| e.to_string())
    })?;
    layer.split.policy = env_parse(env, ENV_POLICY, str::parse)?;
    layer.minify.enabled = env_parse(env, ENV_MINIFY, parse_bool)?;
    layer.minify.backend = env_parse(env, ENV_MINIFY_BACKEND, str::parse)?;
    layer.input.default_language = env_parse(env, ENV_LANGUAGE, str::parse)?;
    layer.output.default_format = env_parse(env, ENV_FORMAT, str::parse)?;

    Ok(layer)
}

fn env_parse<F, T, P>(env: &F, key: &str, parse: P) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Result<T, String>,
{
    match env(key) {
        Some(raw) if !raw.trim().is_empty() => parse(raw.trim())
            .map(Some)
            .map_err(|e| ConfigError::ValidationError(format!("{key}: {e}"))),
        _ => Ok(None),
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(format!("expected a boolean, got {value}")),
    }
}
