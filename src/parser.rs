use std::str::Lines;

use tracing::{debug, trace};

use crate::document::{Document, Entry, Value};
use crate::error::{ParseError, ParseErrorKind};
use crate::syntax::Syntax;

/// U+FEFF, as left at the start of text by editors that save UTF-8 with a byte order mark.
const BOM: char = '\u{FEFF}';

/// Represents an on-going parse.
///
/// The whole input is scanned once, front to back. Parse state lives here and is dropped with the
/// parser, so independent parses never share anything.
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    lines: Lines<'a>,
    syntax: &'a Syntax,
    line_number: usize,
    /// Name of the section the next option goes into; `None` is the top level.
    section: Option<String>,
    /// Key of the last option registered in the current scope. Continuation lines attach to it.
    previous: Option<String>,
    document: Document,
}

impl<'a> Parser<'a> {
    /// A leading byte order mark is skipped.
    #[must_use]
    pub fn new(text: &'a str, syntax: &'a Syntax) -> Self {
        let text = text.strip_prefix(BOM).unwrap_or(text);

        Self {
            lines: text.lines(),
            syntax,
            line_number: 0,
            section: None,
            previous: None,
            document: Document::new(),
        }
    }
}

impl Parser<'_> {
    /// Consume every line and return the finished document.
    ///
    /// # Errors
    ///
    /// Stops at the first malformed section header, missing key or duplicate option.
    pub fn into_document(mut self) -> Result<Document, ParseError> {
        while let Some(line) = self.lines.next() {
            self.line_number += 1;
            self.parse_line(line)
                .map_err(|kind| ParseError::new(kind, self.line_number, line))?;
        }

        debug!(
            lines = self.line_number,
            entries = self.document.len(),
            "parsed document"
        );

        Ok(self.document)
    }

    fn parse_line(&mut self, raw: &str) -> Result<(), ParseErrorKind> {
        let content = strip_comment(raw, &self.syntax.comment_prefixes).trim();

        if content.is_empty() {
            trace!(line = self.line_number, "skipping blank line");
            return Ok(());
        }

        // Header recognition runs on the trimmed line, so an indented `[name]` still opens a
        // section even where it could have been a continuation.
        if let Some(name) = parse_section_header(content)? {
            let name = if self.syntax.trim_section_names {
                name.trim()
            } else {
                name
            };
            return self.open_section(name);
        }

        let (key, value) = parse_option(content, &self.syntax.delimiters)?;

        if value.is_none() && raw.starts_with(char::is_whitespace) && self.continue_previous(content)
        {
            return Ok(());
        }

        self.register(key, value.map_or(Value::Unset, |v| Value::Raw(v.to_owned())))
    }

    fn open_section(&mut self, name: &str) -> Result<(), ParseErrorKind> {
        if self.document.section_mut(name).is_none() {
            return Err(ParseErrorKind::SectionConflict {
                name: name.to_owned(),
            });
        }

        debug!(line = self.line_number, section = name, "entering section");
        self.section = Some(name.to_owned());
        self.previous = None;

        Ok(())
    }

    /// Append `text` to the previous option of the current scope. Returns `false`, changing
    /// nothing, when there is no previous option or its value is unset.
    fn continue_previous(&mut self, text: &str) -> bool {
        let Some(key) = self.previous.as_deref() else {
            return false;
        };

        let value = match self.section.as_deref() {
            None => match self.document.get_mut(key) {
                Some(Entry::Value(value)) => Some(value),
                _ => None,
            },
            Some(name) => self
                .document
                .section_mut(name)
                .and_then(|section| section.get_mut(key)),
        };

        let Some(Value::Raw(existing)) = value else {
            return false;
        };

        if !existing.is_empty() {
            existing.push('\n');
        }
        existing.push_str(text);

        trace!(line = self.line_number, key, "continued value");
        true
    }

    fn register(&mut self, key: &str, value: Value) -> Result<(), ParseErrorKind> {
        let duplicate = || ParseErrorKind::DuplicateOption {
            key: key.to_owned(),
        };

        match self.section.as_deref() {
            None => {
                if self.document.contains_key(key) {
                    return Err(duplicate());
                }
                self.document.insert(key, value);
            }
            Some(name) => {
                let section = self.document.section_mut(name).ok_or_else(|| {
                    ParseErrorKind::SectionConflict {
                        name: name.to_owned(),
                    }
                })?;
                if section.contains_key(key) {
                    return Err(duplicate());
                }
                section.insert(key, value);
            }
        }

        trace!(line = self.line_number, key, "registered option");
        self.previous = Some(key.to_owned());

        Ok(())
    }
}

/// Cut `line` at the first comment character. Whitespace before it is left alone.
fn strip_comment<'l>(line: &'l str, prefixes: &[char]) -> &'l str {
    line.find(prefixes).map_or(line, |i| &line[..i])
}

/// Recognize a `[name]` header on a trimmed line.
///
/// The name is everything between the first `[` and the first `]` after it; anything past the
/// `]` is ignored. Brackets at either end of a line that is not a header are an error.
fn parse_section_header(line: &str) -> Result<Option<&str>, ParseErrorKind> {
    let Some(rest) = line.strip_prefix('[') else {
        return if line.ends_with(']') {
            Err(ParseErrorKind::StraySectionBracket)
        } else {
            Ok(None)
        };
    };

    match rest.find(']') {
        Some(end) => Ok(Some(&rest[..end])),
        None => Err(ParseErrorKind::UnclosedSection),
    }
}

/// Split a trimmed line into a key and an optional value.
///
/// Delimiters are tried in order and only the first occurrence of the winning one splits, so
/// `a = b:c` and `a: b=c` both split on `=`. Without any delimiter the value is unset.
fn parse_option<'l>(
    line: &'l str,
    delimiters: &[char],
) -> Result<(&'l str, Option<&'l str>), ParseErrorKind> {
    let (key, value) = delimiters
        .iter()
        .find_map(|&delimiter| line.split_once(delimiter))
        .map_or((line, None), |(key, value)| (key, Some(value.trim())));
    let key = key.trim();

    if key.is_empty() {
        return Err(ParseErrorKind::MissingKey);
    }

    Ok((key, value))
}
