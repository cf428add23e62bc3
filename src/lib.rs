pub mod cli;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use cli::{Cli, Commands};
pub use error::{AppError, MinifyError, ProcessError};
pub use models::{Block, Config, Language, OutputFormat, SplitReport, TokenPolicy};
pub use services::{BlockSplitter, Minifier, Processor, split};
