//! Greedy word-packing block splitter.

use crate::models::{DEFAULT_MAX_BLOCK_LEN, SplitConfig, TokenPolicy};
use crate::utils::char_len;

/// Split `text` into blocks of at most `max_len` characters using the default token policy.
///
/// A word longer than `max_len` is emitted on its own as an oversized block rather
/// than being cut.
pub fn split(text: &str, max_len: usize) -> Vec<String> {
    BlockSplitter::new(max_len).split(text)
}

/// Splits text into word-aligned blocks.
#[derive(Debug, Clone, Copy)]
pub struct BlockSplitter {
    /// Maximum block length in characters, at least 1
    max_len: usize,
    policy: TokenPolicy,
}

impl Default for BlockSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BLOCK_LEN)
    }
}

impl BlockSplitter {
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len: max_len.max(1),
            policy: TokenPolicy::default(),
        }
    }

    pub fn from_config(config: &SplitConfig) -> Self {
        Self::new(config.max_block_len).with_policy(config.policy)
    }

    #[must_use]
    pub fn with_policy(mut self, policy: TokenPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn policy(&self) -> TokenPolicy {
        self.policy
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        let mut blocks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in words(text, self.policy) {
            let word_len = char_len(word);

            if current_len > 0 && current_len + 1 + word_len > self.max_len {
                blocks.push(std::mem::take(&mut current));
                current_len = 0;
            }

            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }

            current.push_str(word);
            current_len += word_len;
        }

        if current_len > 0 {
            blocks.push(current);
        }

        blocks
    }
}

/// Tokens between single whitespace characters; empty ones survive only under `Preserve`.
fn words(text: &str, policy: TokenPolicy) -> impl Iterator<Item = &str> {
    let preserve = policy == TokenPolicy::Preserve;
    text.split(char::is_whitespace)
        .filter(move |word| preserve || !word.is_empty())
}
