mod minifier;
mod processor;
mod splitter;

pub use minifier::{BuiltinMinifier, CommandMinifier, Minifier, create_minifier};
pub use processor::Processor;
pub use splitter::{BlockSplitter, split};
