use crate::{
    ast::{self, Biblio},
    parse, Error,
};

use super::Format;

/// A type wrapper around [`String`] to represent a `BibTex` format string.
///
/// Composing produces the canonical form: a lowercased entry type, one field per line indented
/// by two spaces and every value wrapped in braces. Entries are separated by a blank line and
/// there is no trailing newline.
#[derive(Debug)]
pub struct BibTex(String);

impl Format for BibTex {
    fn new(val: String) -> Self {
        Self(val)
    }

    fn parse(self) -> Result<Biblio, Error> {
        parse::document(&self.0)
    }

    fn compose(biblio: &Biblio) -> Self {
        let s = biblio
            .entries()
            .iter()
            .map(Self::compose_entry)
            .collect::<Vec<_>>()
            .join("\n\n");
        Self(s)
    }

    fn compose_entry(entry: &ast::Entry) -> String {
        format!(
            "@{}{{{},\n  {}\n}}",
            entry.kind.to_lowercase(),
            entry.cite,
            compose_fields(&entry.fields)
        )
    }

    fn raw(self) -> String {
        self.0
    }

    fn name() -> &'static str {
        "BibTex"
    }

    fn ext() -> &'static str {
        "bib"
    }
}

fn compose_fields(fields: &[ast::Field]) -> String {
    fields
        .iter()
        .map(compose_field)
        .collect::<Vec<_>>()
        .join(",\n  ")
}

fn compose_field(field: &ast::Field) -> String {
    format!("{}={{{}}}", field.name, field.value)
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::ast::{Entry, Field};

    fn entries() -> Vec<Entry> {
        vec![
            Entry::new(
                "Article",
                "doe2024",
                vec![Field::new("title", "A Study"), Field::new("year", "2024")],
            ),
            Entry::new("misc", "empty", vec![]),
        ]
    }

    fn normalize(input: &str) -> String {
        BibTex::new(input.to_owned())
            .parse()
            .map(|biblio| BibTex::compose(&biblio).raw())
            .unwrap()
    }

    #[test]
    fn compose_field_to_bibtex() {
        assert_eq!(compose_field(&Field::new("author", "Me")), "author={Me}");
    }

    #[test]
    fn compose_entry_to_bibtex() {
        let result = BibTex::compose_entry(&entries()[0]);

        // indents and newlines are important in this string so don't format!
        let expected = "@article{doe2024,
  title={A Study},
  year={2024}
}";
        assert_eq!(expected, result);
    }

    #[test]
    fn compose_entry_without_fields() {
        assert_eq!(BibTex::compose_entry(&entries()[1]), "@misc{empty,\n  \n}");
    }

    #[test]
    fn compose_to_bibtex() {
        let result = BibTex::compose(&Biblio::new(entries()));

        let expected = "@article{doe2024,
  title={A Study},
  year={2024}
}

@misc{empty,
  \n}";
        assert_eq!(expected, result.raw());
    }

    #[test]
    fn compose_empty_biblio() {
        assert_eq!(BibTex::compose(&Biblio::default()).raw(), "");
    }

    #[test]
    fn parse_then_compose_bibtex() {
        let composed = normalize("@article{doe2024, title={A Study}, year=2024}");

        assert_eq!(
            composed,
            "@article{doe2024,\n  title={A Study},\n  year={2024}\n}"
        );
    }

    #[test]
    fn quoted_and_bare_values_become_blocks() {
        let composed = normalize("@misc{x, a = \"quoted\", b = bare}");

        assert_eq!(composed, "@misc{x,\n  a={quoted},\n  b={bare}\n}");
    }

    #[test]
    fn nested_braces_survive_round_trip() {
        let composed = normalize("@misc{x, title={outer {inner} text}}");

        assert!(composed.contains("title={outer {inner} text}"));
        assert_eq!(normalize(&composed), composed);
    }

    #[test]
    fn compose_is_a_fixpoint() {
        let input = include_str!("../../tests/data/mixed.bib");
        let once = normalize(input);
        let twice = normalize(&once);

        assert_eq!(once, twice);
    }

    use proptest::prelude::*;

    fn arb_text() -> impl Strategy<Value = String> {
        // values may hold interior whitespace and balanced braces, but a parsed value is
        // always trimmed
        "[a-zA-Z0-9 .:-]{0,8}(\\{[a-zA-Z0-9 ]{0,6}\\})?[a-zA-Z0-9 .]{0,8}"
            .prop_map(|s| s.trim().to_owned())
    }

    fn arb_entry() -> impl Strategy<Value = Entry> {
        (
            "[a-zA-Z]{1,8}",
            "[a-z0-9:_-]{1,10}",
            prop::collection::vec(("[a-z]{1,8}", arb_text()), 0..5),
        )
            .prop_map(|(kind, cite, fields)| {
                Entry::new(
                    kind,
                    cite,
                    fields.into_iter().map(|(k, v)| Field::new(k, v)).collect(),
                )
            })
    }

    proptest! {
        #[test]
        fn normal_form_is_a_fixpoint(entries in prop::collection::vec(arb_entry(), 0..5)) {
            let composed = BibTex::compose(&Biblio::new(entries)).raw();
            prop_assert_eq!(normalize(&composed), composed);
        }
    }
}
