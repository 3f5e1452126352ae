use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassFileError {
    #[error(transparent)]
    IOError(io::Error),
    #[error("Truncated class file")]
    Truncated,
    #[error("Invalid magic identifier: 0x{0:X}")]
    InvalidMagicIdentifier(u32),
    #[error("Invalid cp info tag: {0}")]
    InvalidCpInfoTag(u8),
    #[error("Utf8 entry #{index} is {length} bytes after rewriting, at most 65535 fit")]
    Utf8LengthOverflow { index: u16, length: usize },
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl From<io::Error> for ClassFileError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => ClassFileError::Truncated,
            _ => ClassFileError::IOError(e),
        }
    }
}
