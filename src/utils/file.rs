//! File utilities for reading input and writing blocks.

use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::InputError;
use crate::models::Block;

/// Calculate SHA-256 checksum of content.
pub fn calculate_checksum(content: &str) -> String {
    let hash = Sha256::digest(content.as_bytes());
    hex::encode(hash)
}

/// Read input text from a file, or from stdin when `path` is `None` or `-`.
pub fn read_input(path: Option<&Path>, max_size: u64) -> Result<String, InputError> {
    match path {
        Some(path) if path.to_string_lossy() != "-" => read_file_content(path, max_size),
        _ => read_limited(std::io::stdin().lock(), max_size),
    }
}

/// Read file content with size limit.
pub fn read_file_content(path: &Path, max_size: u64) -> Result<String, InputError> {
    let metadata = fs::metadata(path)?;

    if metadata.len() > max_size {
        return Err(InputError::TooLarge {
            size: metadata.len(),
            max: max_size,
        });
    }

    read_limited(fs::File::open(path)?, max_size)
}

/// Read at most `max_size` bytes, failing if the reader holds more.
pub fn read_limited<R: Read>(reader: R, max_size: u64) -> Result<String, InputError> {
    let mut buffer = Vec::new();
    reader.take(max_size + 1).read_to_end(&mut buffer)?;

    if buffer.len() as u64 > max_size {
        return Err(InputError::TooLarge {
            size: buffer.len() as u64,
            max: max_size,
        });
    }

    String::from_utf8(buffer).map_err(|_| InputError::NotUtf8)
}

/// File name for a block, e.g. `block-007.txt`.
pub fn block_file_name(number: usize, total: usize) -> String {
    let width = total.to_string().len().max(3);
    format!("block-{:0width$}.txt", number, width = width)
}

/// Write each block to its own file under `dir`, creating it if needed.
pub fn write_blocks(dir: &Path, blocks: &[Block]) -> std::io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    blocks
        .iter()
        .map(|block| {
            let path = dir.join(block_file_name(block.number, blocks.len()));
            fs::write(&path, &block.content)?;
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_checksum() {
        let checksum = calculate_checksum("hello world");
        assert_eq!(checksum.len(), 64); // SHA-256 produces 64 hex chars
        assert_eq!(
            checksum,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_read_limited() {
        let text = read_limited("hello".as_bytes(), 5).unwrap();
        assert_eq!(text, "hello");

        let err = read_limited("hello!".as_bytes(), 5).unwrap_err();
        assert!(matches!(err, InputError::TooLarge { max: 5, .. }));

        let err = read_limited(&[0xff, 0xfe][..], 10).unwrap_err();
        assert!(matches!(err, InputError::NotUtf8));
    }

    #[test]
    fn test_read_file_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.js");
        fs::write(&path, "let a = 1;").unwrap();

        assert_eq!(read_file_content(&path, 1024).unwrap(), "let a = 1;");
        assert!(matches!(
            read_file_content(&path, 3),
            Err(InputError::TooLarge { size: 10, max: 3 })
        ));
        assert!(matches!(
            read_file_content(&dir.path().join("missing"), 1024),
            Err(InputError::Io(_))
        ));
    }

    #[test]
    fn test_block_file_name() {
        assert_eq!(block_file_name(1, 2), "block-001.txt");
        assert_eq!(block_file_name(42, 1500), "block-0042.txt");
    }

    #[test]
    fn test_write_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let blocks = Block::from_texts(vec!["first".to_string(), "second".to_string()]);

        let paths = write_blocks(&out, &blocks).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(fs::read_to_string(&paths[0]).unwrap(), "first");
        assert_eq!(fs::read_to_string(out.join("block-002.txt")).unwrap(), "second");
    }
}
