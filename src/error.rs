use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the parser, loader and serializer.
///
/// Messages never include value text from the input, since dotenv files
/// routinely hold secrets.
#[derive(Debug, Error)]
pub enum Error {
    /// A dotenv file could not be read from disk.
    #[error("failed to read env file {}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The input stream failed mid-scan, including input that is not UTF-8.
    #[error("error reading input")]
    Io(#[from] std::io::Error),
    /// A double-quoted or backtick-quoted value could not be unquoted.
    #[error("failed to unquote value at line {line}")]
    Unquote {
        line: u32,
        #[source]
        source: UnquoteError,
    },
    /// An entry cannot be stored in the process environment: the key is
    /// empty or holds `=` or NUL, or the value holds NUL.
    #[error("entry {key:?} cannot be set in the process environment")]
    InvalidEntry { key: String },
    /// A key cannot be written in a form the parser would read back.
    #[error("key {0:?} cannot be serialized as a dotenv entry")]
    InvalidKey(String),
}

impl Error {
    /// Line number of the offending entry, for errors tied to one line.
    pub fn line(&self) -> Option<u32> {
        match self {
            Self::Unquote { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Why a quoted value could not be unquoted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnquoteError {
    #[error("unescaped {0:?} inside quoted value")]
    UnescapedQuote(char),
    #[error("unknown escape sequence `\\{0}`")]
    UnknownEscape(char),
    #[error("incomplete escape sequence")]
    IncompleteEscape,
    #[error("invalid digit {digit:?} in `\\{escape}` escape")]
    InvalidDigit { escape: char, digit: char },
    #[error("octal escape value {0:#o} exceeds 255")]
    OctalOutOfRange(u32),
    #[error("escape sequence names invalid code point {0:#x}")]
    InvalidCodePoint(u32),
    #[error("escaped bytes do not form valid UTF-8")]
    InvalidUtf8,
}
