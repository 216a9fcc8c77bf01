use std::{fmt, io, num};

use thiserror::Error;

/// A grammar violation found while reading a document.
///
/// Reading stops at the first violation, so a failed read yields exactly one of these, carrying
/// the 1-based line number and the raw text of the offending line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}, {text} [line: {line}]")]
pub struct ParseError {
    kind: ParseErrorKind,
    line: usize,
    text: String,
}

impl ParseError {
    #[must_use]
    pub(crate) fn new(kind: ParseErrorKind, line: usize, text: &str) -> Self {
        Self {
            kind,
            line,
            text: text.to_owned(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// 1-based line number of the offending line.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// The offending line exactly as it appeared in the input.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The line starts with `[` but never closes it.
    UnclosedSection,
    /// The line ends with `]` but is not a section header.
    StraySectionBracket,
    /// The line has a delimiter but nothing in front of it.
    MissingKey,
    DuplicateOption { key: String },
    /// A section header reuses the name of a top-level option.
    SectionConflict { name: String },
}

impl ParseErrorKind {
    /// Whether this is one of the malformed-section errors.
    #[must_use]
    pub fn is_section(&self) -> bool {
        matches!(
            self,
            Self::UnclosedSection | Self::StraySectionBracket | Self::SectionConflict { .. }
        )
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::UnclosedSection => "section header is missing a closing bracket".fmt(f),
            Self::StraySectionBracket => "closing bracket outside of a section header".fmt(f),
            Self::MissingKey => "key does not have a name".fmt(f),
            Self::DuplicateOption { ref key } => write!(f, "option with key `{key}` already exists"),
            Self::SectionConflict { ref name } => {
                write!(f, "section `{name}` conflicts with an existing option")
            }
        }
    }
}

/// A looked-up value that could not be converted to the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("unknown boolean state: {value:?}")]
    BadBoolean { value: String },

    #[error("not an integer: {value:?}")]
    BadInteger {
        value: String,
        #[source]
        source: num::ParseIntError,
    },

    #[error("not a number: {value:?}")]
    BadFloat {
        value: String,
        #[source]
        source: num::ParseFloatError,
    },
}

/// Errors from reading or writing through an I/O handle.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to read data")]
    ReadFailure {
        #[source]
        source: io::Error,
    },

    #[error("failed to write data")]
    WriteFailure {
        #[source]
        source: io::Error,
    },
}
