// https://docs.oracle.com/en/java/javase/19/docs/specs/jar/jar.html

mod error;
mod walker;

use std::io::{Read, Seek, Write};

use cpsed_class_file::Mode;

pub use error::JarError;
pub use walker::{JarOptions, Walker};

pub type Result<T, E = JarError> = std::result::Result<T, E>;

/// Lists every constant pool string of every class in the archive.
pub fn scan<R: Read + Seek>(input: R, options: JarOptions, diagnostics: impl Write) -> Result<()> {
    Walker::new(Mode::scan(), options).list(input, diagnostics)
}

/// Lists the constant pool strings matching `pattern`.
pub fn filter<R: Read + Seek>(
    input: R,
    pattern: &str,
    options: JarOptions,
    diagnostics: impl Write,
) -> Result<()> {
    Walker::new(Mode::filter(pattern)?, options).list(input, diagnostics)
}

/// Writes a copy of the archive to `output` with every match of `pattern` in the constant pools
/// replaced by `replacement`, and lists the strings that changed.
pub fn rewrite<R: Read + Seek, W: Write + Seek>(
    input: R,
    pattern: &str,
    replacement: &str,
    output: W,
    options: JarOptions,
    diagnostics: impl Write,
) -> Result<W> {
    Walker::new(Mode::rewrite(pattern, replacement)?, options).rewrite(input, output, diagnostics)
}
