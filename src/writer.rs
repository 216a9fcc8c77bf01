use std::fmt;

use crate::document::{Document, Value};

/// Render `document` as canonical text.
///
/// Top-level options come first, then each section behind a blank line. Unset and empty values
/// are both written as a bare key; a multiline value puts its first line after `key = ` and every
/// following line on its own tab-indented line. Comments and the original delimiter are gone by
/// this point, so the output only preserves what the document holds.
pub(crate) fn write_document<W>(out: &mut W, document: &Document) -> fmt::Result
where
    W: fmt::Write,
{
    let mut first_block = true;

    for (key, value) in document.values() {
        write_option(out, key, value)?;
        first_block = false;
    }

    for (name, section) in document.sections() {
        if !first_block {
            out.write_char('\n')?;
        }
        writeln!(out, "[{name}]")?;
        first_block = false;

        for (key, value) in section.iter() {
            write_option(out, key, value)?;
        }
    }

    Ok(())
}

fn write_option<W>(out: &mut W, key: &str, value: &Value) -> fmt::Result
where
    W: fmt::Write,
{
    match value.as_str() {
        Some(text) if !text.is_empty() => {
            let mut lines = text.split('\n');
            writeln!(out, "{key} = {}", lines.next().unwrap_or_default())?;

            for line in lines {
                writeln!(out, "\t{line}")?;
            }

            Ok(())
        }
        _ => writeln!(out, "{key}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Section;

    #[test]
    fn flat() {
        let doc: Document = [("name", "joe"), ("who", "joe mama")].into_iter().collect();

        assert_eq!(doc.to_string(), "name = joe\nwho = joe mama\n");
    }

    #[test]
    fn falsy_values_are_bare_keys() {
        let mut doc = Document::new();
        doc.insert("unset", Value::Unset);
        doc.insert("empty", "");

        assert_eq!(doc.to_string(), "unset\nempty\n");
    }

    #[test]
    fn multiline_value_is_tab_indented() {
        let doc: Document = [("content", "fake1\nfake2\nfake3")].into_iter().collect();

        assert_eq!(doc.to_string(), "content = fake1\n\tfake2\n\tfake3\n");
    }

    #[test]
    fn first_section_has_no_leading_blank_line() {
        let mut doc = Document::new();
        doc.insert("a", [("x", "1")].into_iter().collect::<Section>());
        doc.insert("b", [("y", "2")].into_iter().collect::<Section>());

        assert_eq!(doc.to_string(), "[a]\nx = 1\n\n[b]\ny = 2\n");
    }

    #[test]
    fn top_level_values_precede_sections() {
        let mut doc = Document::new();
        doc.insert("s", [("x", "1")].into_iter().collect::<Section>());
        doc.insert("late", "v");

        assert_eq!(doc.to_string(), "late = v\n\n[s]\nx = 1\n");
    }

    #[test]
    fn empty_section() {
        let mut doc = Document::new();
        doc.insert("top", "1");
        doc.insert("s", Section::new());

        assert_eq!(doc.to_string(), "top = 1\n\n[s]\n");
    }

    #[test]
    fn empty_document() {
        assert_eq!(Document::new().to_string(), "");
    }
}
