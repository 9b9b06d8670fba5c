use crate::{
    ast::{Biblio, Entry},
    Error, ErrorKind,
};

use super::Format;

/// A type wrapper around [`String`] to represent a JSON export of a [`Biblio`].
///
/// The document is an array of entries, each an object with `kind`, `cite` and an ordered
/// `fields` array of `name`/`value` objects.
#[derive(Debug)]
pub struct Json(String);

impl Format for Json {
    fn new(val: String) -> Self {
        Self(val)
    }

    fn parse(self) -> Result<Biblio, Error> {
        serde_json::from_str(&self.0).map_err(|e| {
            Error::wrap_with(ErrorKind::Deserialize, e, "Unable to parse string as JSON")
        })
    }

    fn compose(biblio: &Biblio) -> Self {
        Self(
            serde_json::to_string_pretty(biblio)
                .expect("A bibliography of plain strings should always serialize"),
        )
    }

    fn compose_entry(entry: &Entry) -> String {
        serde_json::to_string_pretty(entry)
            .expect("An entry of plain strings should always serialize")
    }

    fn raw(self) -> String {
        self.0
    }

    fn name() -> &'static str {
        "JSON"
    }

    fn ext() -> &'static str {
        "json"
    }
}
