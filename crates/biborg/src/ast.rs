//! The in-memory model of a bibliography: a [`Biblio`] owns [`Entry`]s which own [`Field`]s.
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An ordered list of bibliography entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Biblio(Vec<Entry>);

impl Biblio {
    /// Create a new [`Biblio`] from a list of bibliography entries.
    #[must_use]
    pub const fn new(entries: Vec<Entry>) -> Self {
        Self(entries)
    }

    /// Insert a new [`Entry`] after all existing entries.
    pub fn insert(&mut self, entry: Entry) {
        self.0.push(entry);
    }

    /// Return a reference to a slice of entries.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.0
    }

    /// Return a mutable reference to a slice of entries.
    #[must_use]
    pub fn entries_mut(&mut self) -> &mut [Entry] {
        &mut self.0
    }

    /// Creates entries from a value.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // drop is not const
    pub fn into_entries(self) -> Vec<Entry> {
        self.0
    }

    /// The number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sorts the entries by their citation key.
    ///
    /// The sort is stable so entries with the same citation key keep their relative order.
    pub fn sort_entries(&mut self) {
        debug!("Sorting {} entries by citation key", self.0.len());
        self.0.sort_by(|a, b| a.cite.cmp(&b.cite));
    }

    /// Sorts the fields of every entry by their name, see [`Entry::sort_fields`].
    pub fn sort_fields(&mut self) {
        debug!("Sorting the fields of {} entries", self.0.len());
        for entry in &mut self.0 {
            entry.sort_fields();
        }
    }
}

impl From<Vec<Entry>> for Biblio {
    fn from(entries: Vec<Entry>) -> Self {
        Self(entries)
    }
}

impl IntoIterator for Biblio {
    type Item = Entry;

    type IntoIter = <Vec<Entry> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A single bibliography entry such as `@article{doe2024, ...}`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entry {
    /// The type of entry as written in the source, e.g. `article` or `Misc`.
    ///
    /// This is free-form and only lowercased when composed.
    pub kind: String,

    /// The citation key for the entry.
    pub cite: String,

    /// List of [`Field`]s in source order. Names may repeat.
    pub fields: Vec<Field>,
}

impl Entry {
    /// Create a new [`Entry`].
    pub fn new<K, C>(kind: K, cite: C, fields: Vec<Field>) -> Self
    where
        K: Into<String>,
        C: Into<String>,
    {
        Self {
            kind: kind.into(),
            cite: cite.into(),
            fields,
        }
    }

    /// Get the value of the first field named `name`.
    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(Field::value)
    }

    /// Sorts the fields by their name.
    ///
    /// The sort is stable so repeated field names keep their relative order.
    pub fn sort_fields(&mut self) {
        self.fields.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

/// An entry field which is essentially a key value pair.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Field {
    /// Name of the entry field.
    pub name: String,
    /// Value of the entry field.
    pub value: String,
}

impl Field {
    /// Create a new [`Field`].
    pub fn new<N, V>(name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The `&str` representation of the `value` field.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}
