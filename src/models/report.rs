//! Result of processing one input.

use serde::{Deserialize, Serialize};

use super::block::Block;
use super::language::Language;

/// What happened when minification was attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MinifyOutcome {
    /// Minified text was used as splitter input
    Applied,
    /// Minification was turned off or not meaningful for the language
    Skipped,
    /// Minifier failed; the original text was used instead
    Failed { reason: String },
}

impl MinifyOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, MinifyOutcome::Failed { .. })
    }
}

/// Processed text and the blocks it was split into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitReport {
    pub language: Language,
    pub minify: MinifyOutcome,
    pub max_len: usize,
    pub total_chars: usize,
    pub block_count: usize,
    pub blocks: Vec<Block>,

    /// Text that was handed to the splitter
    #[serde(skip)]
    pub text: String,
}

impl SplitReport {
    pub fn new(
        language: Language,
        minify: MinifyOutcome,
        max_len: usize,
        text: String,
        blocks: Vec<Block>,
    ) -> Self {
        Self {
            language,
            minify,
            max_len,
            total_chars: text.chars().count(),
            block_count: blocks.len(),
            blocks,
            text,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Look up a block by its 1-based number.
    pub fn block(&self, number: usize) -> Option<&Block> {
        number
            .checked_sub(1)
            .and_then(|idx| self.blocks.get(idx))
    }

    pub fn oversized_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.is_oversized(self.max_len))
    }
}
