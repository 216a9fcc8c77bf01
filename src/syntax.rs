use serde::{Deserialize, Serialize};

/// Lexical settings for a parse.
///
/// These are fixed for the lifetime of a [`crate::Parser`]; nothing here is global.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Syntax {
    /// Any of these characters starts a comment that runs to the end of the line. There is no
    /// quoting or escaping.
    pub comment_prefixes: Vec<char>,
    /// Key/value delimiters, tried in order. The first one found on the line wins.
    pub delimiters: Vec<char>,
    /// Trim whitespace inside `[ ... ]`. Off by default, so `[ main ]` names the section `" main "`.
    pub trim_section_names: bool,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            comment_prefixes: vec![';', '#'],
            delimiters: vec!['=', ':'],
            trim_section_names: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let syntax: Syntax = serde_json::from_str(r#"{"trim_section_names": true}"#)
            .expect("expected hardcoded JSON to be valid");

        assert_eq!(syntax.comment_prefixes, [';', '#']);
        assert_eq!(syntax.delimiters, ['=', ':']);
        assert!(syntax.trim_section_names);
    }
}
