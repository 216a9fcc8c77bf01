//! Reader and writer for a small INI dialect.
//!
//! ```ini
//! ; top-level options come before any section
//! name = joe
//! flag
//!
//! [main]
//! greeting = hello
//!     world        # continues `greeting` on a new line
//! ```
//!
//! Options split on the first `=`, or failing that the first `:`. A line without a delimiter
//! declares an option with an *unset* value, which is different from an empty one (`key =`). An
//! indented line without a delimiter that follows an option with a value is appended to that
//! value instead. `;` and `#` start a comment anywhere on a line; there is no quoting.
//!
//! [`write`] does not round-trip text. It renders a canonical form of the parsed [`Document`],
//! dropping comments and writing unset and empty values alike as a bare key.
#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

mod convert;
mod document;
mod error;
mod parser;
mod syntax;
mod writer;

use std::io;

pub use convert::{Lookup, parse_bool};
pub use document::{Document, Entry, Section, Value};
pub use error::{ConvertError, Error, ParseError, ParseErrorKind};
pub use parser::Parser;
pub use syntax::Syntax;

/// Parse `text` with the default [`Syntax`].
///
/// # Errors
///
/// Returns the first malformed section header, missing key or duplicate option found.
pub fn read(text: &str) -> Result<Document, ParseError> {
    read_with(text, &Syntax::default())
}

/// # Errors
///
/// Same as [`read`].
pub fn read_with(text: &str, syntax: &Syntax) -> Result<Document, ParseError> {
    Parser::new(text, syntax).into_document()
}

/// Read everything from `reader` and parse it with the default [`Syntax`].
///
/// # Errors
///
/// [`Error::ReadFailure`] if the reader fails or yields invalid UTF-8, [`Error::Parse`] if the
/// text does not parse.
pub fn from_reader<R>(reader: &mut R) -> Result<Document, Error>
where
    R: io::Read,
{
    from_reader_with(reader, &Syntax::default())
}

/// # Errors
///
/// Same as [`from_reader`].
pub fn from_reader_with<R>(reader: &mut R, syntax: &Syntax) -> Result<Document, Error>
where
    R: io::Read,
{
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|source| Error::ReadFailure { source })?;

    Ok(read_with(&text, syntax)?)
}

/// Write the canonical text of `document` to `dest`.
///
/// Scopes are written in stored order, except that all top-level options are written before the
/// first section; a top-level option placed after a section with [`Document::insert`] would
/// otherwise read back as part of that section.
///
/// # Errors
///
/// [`Error::WriteFailure`] if writing to or flushing `dest` fails.
pub fn write<W>(document: &Document, dest: &mut W) -> Result<(), Error>
where
    W: io::Write,
{
    dest.write_all(document.to_string().as_bytes())
        .and_then(|()| dest.flush())
        .map_err(|source| Error::WriteFailure { source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_from_reader() {
        let mut buffer = io::Cursor::new(b"[main]\nname = sven\nage = 22\n".to_vec());
        let doc = from_reader(&mut buffer).expect("failed to parse hardcoded document");

        let main = doc.section("main").expect("expected section `main`");
        assert_eq!(main.get_int("age").expect("expected an integer"), Some(22));
    }

    #[test]
    fn reader_surfaces_parse_errors() {
        let mut buffer = io::Cursor::new(b"a = 1\na = 2\n".to_vec());
        let err = from_reader(&mut buffer).expect_err("expected duplicate error");

        assert!(matches!(err, Error::Parse(ref e) if e.line() == 2));
    }

    #[test]
    fn reader_rejects_invalid_utf8() {
        let mut buffer = io::Cursor::new(vec![0xFF, 0xFE, 0x00]);
        let err = from_reader(&mut buffer).expect_err("expected read failure");

        assert!(matches!(err, Error::ReadFailure { .. }));
    }

    #[test]
    fn writes_to_sink() {
        let doc = read("a = 1\n[s]\nb\n").expect("failed to parse hardcoded document");
        let mut out = Vec::new();

        write(&doc, &mut out).expect("writing to a Vec cannot fail");

        assert_eq!(out, b"a = 1\n\n[s]\nb\n");
    }

    #[test]
    fn from_str() {
        let doc: Document = "x: 1".parse().expect("failed to parse hardcoded document");

        assert_eq!(doc.value("x"), Some(&Value::from("1")));
    }
}
