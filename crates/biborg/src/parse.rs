//! Recursive descent parsing of BibTeX source text into a [`Biblio`].
//!
//! A document is a sequence of `@type{cite, key=value, ...}` entries separated by whitespace.
//! Values are brace blocks (which may nest), quoted literals or bare tokens, see [`scan`].
//! Parsing is all or nothing: the first syntax error aborts the whole document.

pub mod scan;

use log::{debug, trace};
use memchr::memchr;

use crate::{
    ast::{Biblio, Entry, Field},
    error::{Error, ErrorKind},
};

use scan::{BLOCK_START, LIST_SEP};

const FIELD_SEP: u8 = b'=';

/// Parse a whole document.
///
/// # Errors
/// Returns the first syntax error found. No partial [`Biblio`] is returned.
///
/// # Examples
/// ```
/// let biblio = biborg::parse::document("@article{doe2024, title={A Study}, year=2024}")?;
///
/// let entry = &biblio.entries()[0];
/// assert_eq!(entry.cite, "doe2024");
/// assert_eq!(entry.get_field("year"), Some("2024"));
/// # Ok::<(), biborg::Error>(())
/// ```
pub fn document(input: &str) -> Result<Biblio, Error> {
    let mut biblio = Biblio::default();
    let mut pos = scan::skip_whitespace(input, 0);

    while let Some(c) = scan::char_at(input, pos) {
        if c != '@' {
            return Err(Error::at(
                ErrorKind::UnexpectedChar,
                input,
                pos,
                format!("expected an '@' to start an entry but found '{c}'"),
            ));
        }

        let kind_start = pos + 1;
        let open = memchr(BLOCK_START, &input.as_bytes()[kind_start..])
            .map(|offset| kind_start + offset)
            .ok_or_else(|| {
                Error::at(
                    ErrorKind::ExpectedBlockOpen,
                    input,
                    input.len(),
                    "expected a '{' to open the entry but found the end of input",
                )
            })?;
        let kind = input[kind_start..open].trim();

        let (end, body) = scan::read_block(input, open, false)?;
        let body_start = open + 1;

        // Parse the body in place so that error positions refer to the whole document.
        let entry = entry_within(kind, &input[..body_start + body.len()], body_start)?;
        trace!(
            "Parsed @{} entry '{}' with {} fields",
            entry.kind,
            entry.cite,
            entry.fields.len()
        );
        biblio.insert(entry);

        pos = scan::skip_whitespace(input, end);
    }

    debug!("Parsed {} entries", biblio.len());
    Ok(biblio)
}

/// Parse the body of an entry, the text between the outer braces of `@kind{...}`.
///
/// # Errors
/// - [`ErrorKind::MissingCiteSeparator`] if there is no comma after the citation key.
/// - Any error from parsing the fields, see [`field`].
///
/// # Examples
/// ```
/// let entry = biborg::parse::entry("misc", " b, k={1}")?;
///
/// assert_eq!(entry.cite, "b");
/// assert_eq!(entry.get_field("k"), Some("1"));
/// # Ok::<(), biborg::Error>(())
/// ```
pub fn entry(kind: &str, body: &str) -> Result<Entry, Error> {
    entry_within(kind, body, 0)
}

/// Parse an entry body which runs from `start` to the end of `text`.
fn entry_within(kind: &str, text: &str, start: usize) -> Result<Entry, Error> {
    let sep = memchr(LIST_SEP, &text.as_bytes()[start..])
        .map(|offset| start + offset)
        .ok_or_else(|| {
            Error::at(
                ErrorKind::MissingCiteSeparator,
                text,
                start,
                format!(
                    "expected a ',' after the citation key '{}'",
                    text[start..].trim()
                ),
            )
        })?;
    let cite = text[start..sep].trim();

    let mut fields = Vec::new();
    let mut pos = scan::skip_whitespace(text, sep + 1);
    while pos < text.len() {
        let (next, field) = field(text, pos)?;
        fields.push(field);
        pos = next;
    }

    Ok(Entry::new(kind, cite, fields))
}

/// Parse one `key=value` field starting at `pos`.
///
/// Returns the position of the next field, which is `text.len()` after the last field. A
/// comma following the value is consumed if there is one, along with any whitespace around it.
///
/// # Errors
/// - [`ErrorKind::MissingFieldSeparator`] if no `=` follows the key.
/// - Any error from reading the value, see [`scan::read_value`].
pub fn field(text: &str, pos: usize) -> Result<(usize, Field), Error> {
    let eq = text
        .as_bytes()
        .get(pos..)
        .and_then(|rest| memchr(FIELD_SEP, rest))
        .map(|offset| pos + offset)
        .ok_or_else(|| {
            Error::at(
                ErrorKind::MissingFieldSeparator,
                text,
                pos,
                format!(
                    "expected an '=' after the field key '{}'",
                    text.get(pos..).unwrap_or_default().trim()
                ),
            )
        })?;
    let name = text[pos..eq].trim();

    let (end, value) = scan::read_value(text, eq + 1, false)?;
    trace!("Parsed field '{name}'");

    Ok((skip_separator(text, end), Field::new(name, value.trim())))
}

/// Skip whitespace and then a single list separator if there is one.
fn skip_separator(text: &str, pos: usize) -> usize {
    let pos = scan::skip_whitespace(text, pos);
    if text.as_bytes().get(pos) == Some(&LIST_SEP) {
        scan::skip_whitespace(text, pos + 1)
    } else {
        pos
    }
}
