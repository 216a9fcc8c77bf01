use crate::document::{Document, Section, Value};
use crate::error::ConvertError;

/// Recognized boolean spellings, compared case-insensitively.
const BOOL_STATES: &[(&str, bool)] = &[
    ("false", false),
    ("0", false),
    ("off", false),
    ("no", false),
    ("true", true),
    ("1", true),
    ("on", true),
    ("yes", true),
];

/// Interpret `value` as a boolean. Surrounding whitespace is ignored.
///
/// # Errors
///
/// [`ConvertError::BadBoolean`] for anything outside `true/1/on/yes` and `false/0/off/no`.
pub fn parse_bool(value: &str) -> Result<bool, ConvertError> {
    let trimmed = value.trim();

    BOOL_STATES
        .iter()
        .find(|(state, _)| trimmed.eq_ignore_ascii_case(state))
        .map(|&(_, b)| b)
        .ok_or_else(|| ConvertError::BadBoolean {
            value: value.to_owned(),
        })
}

/// Typed lookups over one scope: the top level of a [`Document`], or a [`Section`].
///
/// Every getter returns `Ok(None)` when the key is missing, unset, or empty, and an error only
/// when there is text that does not convert.
pub trait Lookup {
    fn lookup(&self, key: &str) -> Option<&Value>;

    fn get_str(&self, key: &str) -> Option<&str> {
        self.lookup(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// # Errors
    ///
    /// [`ConvertError::BadBoolean`] if the text is not a recognized boolean.
    fn get_bool(&self, key: &str) -> Result<Option<bool>, ConvertError> {
        self.get_str(key).map(parse_bool).transpose()
    }

    /// # Errors
    ///
    /// [`ConvertError::BadInteger`] if the text is not an `i64`.
    fn get_int(&self, key: &str) -> Result<Option<i64>, ConvertError> {
        self.get_str(key)
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|source| ConvertError::BadInteger {
                        value: s.to_owned(),
                        source,
                    })
            })
            .transpose()
    }

    /// # Errors
    ///
    /// [`ConvertError::BadFloat`] if the text is not an `f64`.
    fn get_float(&self, key: &str) -> Result<Option<f64>, ConvertError> {
        self.get_str(key)
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|source| ConvertError::BadFloat {
                        value: s.to_owned(),
                        source,
                    })
            })
            .transpose()
    }
}

impl Lookup for Document {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.value(key)
    }
}

impl Lookup for Section {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_states() {
        for s in ["true", "1", "on", "yes", "TRUE", "Yes", " on "] {
            assert_eq!(parse_bool(s), Ok(true), "{s:?}");
        }
        for s in ["false", "0", "off", "no", "False", "NO"] {
            assert_eq!(parse_bool(s), Ok(false), "{s:?}");
        }
    }

    #[test]
    fn unknown_bool_state() {
        assert_eq!(
            parse_bool("maybe"),
            Err(ConvertError::BadBoolean {
                value: "maybe".to_owned()
            })
        );
    }

    #[test]
    fn section_lookups() {
        let section: Section = [
            ("age", Value::from("22")),
            ("ratio", Value::from("0.5")),
            ("debug", Value::from("on")),
            ("name", Value::from("sven")),
            ("flag", Value::Unset),
            ("empty", Value::from("")),
        ]
        .into_iter()
        .collect();

        assert_eq!(section.get_int("age"), Ok(Some(22)));
        assert_eq!(section.get_float("ratio"), Ok(Some(0.5)));
        assert_eq!(section.get_bool("debug"), Ok(Some(true)));
        assert_eq!(section.get_str("name"), Some("sven"));

        assert_eq!(section.get_int("flag"), Ok(None));
        assert_eq!(section.get_bool("empty"), Ok(None));
        assert_eq!(section.get_float("missing"), Ok(None));

        assert!(matches!(
            section.get_int("name"),
            Err(ConvertError::BadInteger { .. })
        ));
        assert!(matches!(
            section.get_float("name"),
            Err(ConvertError::BadFloat { .. })
        ));
        assert!(matches!(
            section.get_bool("age"),
            Err(ConvertError::BadBoolean { .. })
        ));
    }

    #[test]
    fn document_lookup_ignores_sections() {
        let mut doc = Document::new();
        doc.insert("port", "8080");
        doc.insert("main", [("port", "1")].into_iter().collect::<Section>());

        assert_eq!(doc.get_int("port"), Ok(Some(8080)));
        assert_eq!(doc.get_str("main"), None);
    }
}
