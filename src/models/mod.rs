mod block;
mod config;
mod format;
mod language;
mod report;

pub use block::{Block, TokenPolicy};
pub use config::{
    Config, ConfigSource, ConfigSources, DEFAULT_MAX_BLOCK_LEN, DEFAULT_MAX_INPUT_BYTES,
    DEFAULT_MINIFY_PROGRAM, InputConfig, MinifyBackend, MinifyConfig, OutputConfig,
    ResolvedConfig, SplitConfig,
};
pub use format::OutputFormat;
pub use language::Language;
pub use report::{MinifyOutcome, SplitReport};
