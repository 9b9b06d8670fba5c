#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]

//! # biborg
//!
//! biborg parses BibTeX bibliographies into an in-memory model, optionally sorts the entries
//! and their fields and composes the result back to a canonical [`format::BibTex`] text.
//!
//! ```
//! use biborg::SortOptions;
//!
//! let input = "@misc{b, k={1}}\n@misc{a, k = \"2\"}";
//! let output = biborg::organise_bibtex(input, SortOptions::default())?;
//!
//! assert_eq!(output, "@misc{a,\n  k={2}\n}\n\n@misc{b,\n  k={1}\n}");
//! # Ok::<(), biborg::Error>(())
//! ```

pub mod ast;
mod error;
#[cfg(feature = "file")]
pub mod file;
pub mod format;
pub mod parse;

use ast::Biblio;
pub use error::{Error, ErrorKind, Position};

use format::{BibTex, Format};
use log::trace;

/// Which sort transforms [`organise`] applies.
///
/// The default sorts entries by citation key and leaves the fields of each entry in source
/// order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SortOptions {
    /// Sort entries by their citation key.
    pub sort_entries: bool,
    /// Sort the fields within each entry by their name.
    pub sort_fields: bool,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            sort_entries: true,
            sort_fields: false,
        }
    }
}

/// Apply the sort transforms selected by `options` to `biblio`.
///
/// Sorting only changes the order of entries and fields, never their content.
#[must_use]
pub fn organise(mut biblio: Biblio, options: SortOptions) -> Biblio {
    trace!("Organising bibliography with {options:?}");

    if options.sort_fields {
        biblio.sort_fields();
    }

    if options.sort_entries {
        biblio.sort_entries();
    }

    biblio
}

/// Parse BibTeX text, [`organise`] it and compose it back to canonical BibTeX text.
///
/// # Errors
///
/// An [`Err`] is returned if `input` is not valid BibTeX, in which case nothing is composed.
pub fn organise_bibtex(input: &str, options: SortOptions) -> Result<String, Error> {
    let biblio = BibTex::new(input.to_owned()).parse()?;
    Ok(BibTex::compose(&organise(biblio, options)).raw())
}
