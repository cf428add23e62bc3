//! Utility modules.

pub mod file;
pub mod text;

pub use file::{
    block_file_name, calculate_checksum, read_file_content, read_input, read_limited,
    write_blocks,
};
pub use text::{char_len, preview};
