//! Scripted input for headless runs.
//!
//! One line per tick, listing the keys held during that tick:
//!
//! ```text
//! # walk right, then swing
//! d
//! d, w
//!
//! space
//! ```
//!
//! Keys are separated by whitespace or commas. Text after `#` is ignored and
//! comment-only lines are skipped. An empty line is a tick with no keys held.

use std::fs;
use std::path::Path;

use lulu_common::{CommonError, Key};
use thiserror::Error;

/// Errors that can occur while reading an input script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Failed to read file.
    #[error("Failed to read input script: {0}")]
    ReadError(#[from] std::io::Error),

    /// A key name was not recognised.
    #[error("Input script line {line}: {source}")]
    BadKey {
        /// 1-based line number
        line: usize,
        /// Underlying parse error
        source: CommonError,
    },
}

/// Result type for input scripts.
pub type ScriptResult<T> = Result<T, ScriptError>;

/// Keys held on each tick of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputScript {
    ticks: Vec<Vec<Key>>,
}

impl InputScript {
    /// Parses script text.
    pub fn parse(text: &str) -> ScriptResult<Self> {
        let mut ticks = Vec::new();
        for (i, raw) in text.lines().enumerate() {
            if raw.trim_start().starts_with('#') {
                continue;
            }
            let content = raw.split('#').next().unwrap_or_default();
            let keys = content
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|name| !name.is_empty())
                .map(str::parse::<Key>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| ScriptError::BadKey { line: i + 1, source })?;
            ticks.push(keys);
        }
        Ok(Self { ticks })
    }

    /// Reads a script file.
    pub fn from_file(path: impl AsRef<Path>) -> ScriptResult<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Number of scripted ticks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    /// Returns `true` if the script has no ticks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Keys for tick `index` (0-based). Nothing is held past the end.
    #[must_use]
    pub fn keys_at(&self, index: usize) -> &[Key] {
        self.ticks.get(index).map(Vec::as_slice).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let script = InputScript::parse("# header\nd\nd, w\n\nSPACE enter\n").expect("valid");
        assert_eq!(script.len(), 4);
        assert_eq!(script.keys_at(0), &[Key::D]);
        assert_eq!(script.keys_at(1), &[Key::D, Key::W]);
        assert!(script.keys_at(2).is_empty());
        assert_eq!(script.keys_at(3), &[Key::Space, Key::Enter]);
        assert!(script.keys_at(99).is_empty());
    }

    #[test]
    fn test_trailing_comment() {
        let script = InputScript::parse("left # walk back").expect("valid");
        assert_eq!(script.keys_at(0), &[Key::Left]);
    }

    #[test]
    fn test_unknown_key_reports_line() {
        let err = InputScript::parse("d\njump").expect_err("bad key");
        assert!(matches!(err, ScriptError::BadKey { line: 2, .. }));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            InputScript::from_file("/nonexistent/inputs.txt"),
            Err(ScriptError::ReadError(_))
        ));
    }
}
