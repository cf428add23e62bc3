mod config;
mod languages;
mod minify;
mod split;

pub use config::ConfigCommand;
pub use minify::MinifyArgs;
pub use split::SplitArgs;

pub use config::handle_config;
pub use languages::handle_languages;
pub use minify::handle_minify;
pub use split::handle_split;
