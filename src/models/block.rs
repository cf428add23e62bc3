//! Block models produced by the splitter.

use serde::{Deserialize, Serialize};

use crate::utils::{calculate_checksum, char_len};

/// How empty tokens between consecutive whitespace characters are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPolicy {
    /// Drop empty tokens; whitespace runs become a single space.
    #[default]
    Collapse,
    /// Keep empty tokens; each whitespace character becomes one space.
    Preserve,
}

impl std::str::FromStr for TokenPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "collapse" => Ok(TokenPolicy::Collapse),
            "preserve" => Ok(TokenPolicy::Preserve),
            _ => Err(format!("unknown token policy: {} (use collapse or preserve)", s)),
        }
    }
}

impl std::fmt::Display for TokenPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenPolicy::Collapse => write!(f, "collapse"),
            TokenPolicy::Preserve => write!(f, "preserve"),
        }
    }
}

/// One numbered output block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// 1-based position in the block sequence
    pub number: usize,
    /// Length in characters
    pub char_len: usize,
    /// SHA-256 of the content, hex encoded
    pub checksum: String,
    pub content: String,
}

impl Block {
    pub fn new(number: usize, content: String) -> Self {
        Self {
            number,
            char_len: char_len(&content),
            checksum: calculate_checksum(&content),
            content,
        }
    }

    /// Number the raw splitter output starting at 1.
    pub fn from_texts(texts: Vec<String>) -> Vec<Self> {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, content)| Block::new(i + 1, content))
            .collect()
    }

    /// Whether the block is longer than `max_len`, which only happens for a single long word.
    pub fn is_oversized(&self, max_len: usize) -> bool {
        self.char_len > max_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_texts_numbers_from_one() {
        let blocks = Block::from_texts(vec!["a b".to_string(), "c".to_string()]);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].number, 1);
        assert_eq!(blocks[1].number, 2);
        assert_eq!(blocks[0].char_len, 3);
    }

    #[test]
    fn test_char_len_counts_chars_not_bytes() {
        let block = Block::new(1, "héllo wörld".to_string());
        assert_eq!(block.char_len, 11);
        assert!(!block.is_oversized(11));
        assert!(block.is_oversized(10));
    }

    #[test]
    fn test_checksum_is_stable() {
        let a = Block::new(1, "same".to_string());
        let b = Block::new(7, "same".to_string());
        assert_eq!(a.checksum, b.checksum);
        assert_eq!(a.checksum.len(), 64);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("Preserve".parse::<TokenPolicy>().unwrap(), TokenPolicy::Preserve);
        assert_eq!("collapse".parse::<TokenPolicy>().unwrap(), TokenPolicy::Collapse);
        assert!("squash".parse::<TokenPolicy>().is_err());
    }
}
