use std::borrow::Cow;

use regex::bytes::{NoExpand, Regex};

use crate::Result;

/// What the transcoder does with each `Utf8` entry it walks past.
#[derive(Debug, Clone)]
pub enum Mode {
    /// Report every string.
    Scan,
    /// Report strings the pattern matches.
    Filter(Regex),
    /// Replace every match and report the strings that changed.
    Rewrite(Substitution),
}
impl Mode {
    pub fn scan() -> Self {
        Mode::Scan
    }

    pub fn filter(pattern: &str) -> Result<Self> {
        Ok(Mode::Filter(Regex::new(pattern)?))
    }

    pub fn rewrite(pattern: &str, replacement: impl Into<Vec<u8>>) -> Result<Self> {
        Ok(Mode::Rewrite(Substitution::new(
            Regex::new(pattern)?,
            replacement,
        )))
    }
}

#[derive(Debug, Clone)]
pub struct Substitution {
    pattern: Regex,
    replacement: Vec<u8>,
}
impl Substitution {
    pub fn new(pattern: Regex, replacement: impl Into<Vec<u8>>) -> Self {
        Self {
            pattern,
            replacement: replacement.into(),
        }
    }

    /// Replaces every non-overlapping match with the replacement text, taken literally: `$1`
    /// in the replacement is inserted as is.
    pub fn apply<'a>(&self, bytes: &'a [u8]) -> RewriteResult<'a> {
        let rewritten = self
            .pattern
            .replace_all(bytes, NoExpand(&self.replacement));
        // An empty match replaced by an empty string still allocates
        let changed = rewritten.as_ref() != bytes;

        RewriteResult {
            original: bytes,
            rewritten,
            changed,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct RewriteResult<'a> {
    pub original: &'a [u8],
    pub rewritten: Cow<'a, [u8]>,
    pub changed: bool,
}


#[cfg(test)]
mod mode_tests {
    use crate::ClassFileError;

    use super::*;

    #[test]
    fn it_should_reject_an_invalid_pattern() {
        assert!(matches!(
            Mode::filter("("),
            Err(ClassFileError::InvalidPattern(_))
        ));
        assert!(matches!(
            Mode::rewrite("[", "x"),
            Err(ClassFileError::InvalidPattern(_))
        ));
    }
}
