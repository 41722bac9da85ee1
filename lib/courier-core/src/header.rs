//! HTTP header fields.
//!
//! A [`Header`] holds at most one value per case-insensitive [`FieldName`].
//! [`Header::add`] merges repeated fields by joining values with a comma,
//! [`Header::set`] replaces them.
//!
//! # Example
//!
//! ```
//! use courier_core::{FieldName, Header, HeaderField};
//!
//! let header: Header = [
//!     HeaderField::new("Accept", "text/html"),
//!     HeaderField::new("accept", "application/json"),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(header.get(&FieldName::ACCEPT), Some("text/html,application/json"));
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::{CaseInsensitiveString, MediaType};

/// Case-insensitive header field name.
pub type FieldName = CaseInsensitiveString;

impl FieldName {
    /// `Accept`
    pub const ACCEPT: Self = Self::from_static("Accept");
    /// `Accept-Encoding`
    pub const ACCEPT_ENCODING: Self = Self::from_static("Accept-Encoding");
    /// `Accept-Language`
    pub const ACCEPT_LANGUAGE: Self = Self::from_static("Accept-Language");
    /// `Authorization`
    pub const AUTHORIZATION: Self = Self::from_static("Authorization");
    /// `Cache-Control`
    pub const CACHE_CONTROL: Self = Self::from_static("Cache-Control");
    /// `Content-Length`
    pub const CONTENT_LENGTH: Self = Self::from_static("Content-Length");
    /// `Content-Type`
    pub const CONTENT_TYPE: Self = Self::from_static("Content-Type");
    /// `User-Agent`
    pub const USER_AGENT: Self = Self::from_static("User-Agent");
}

/// A single `name: value` header field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeaderField {
    /// Field name.
    pub name: FieldName,
    /// Field value.
    pub value: String,
}

impl HeaderField {
    /// Creates a field.
    #[must_use]
    pub fn new(name: impl Into<FieldName>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// `Accept: <media type>`
    #[must_use]
    pub fn accept(media_type: &MediaType) -> Self {
        Self::new(FieldName::ACCEPT, media_type.raw_value())
    }

    /// `Authorization: <credentials>`
    #[must_use]
    pub fn authorization(credentials: impl Into<String>) -> Self {
        Self::new(FieldName::AUTHORIZATION, credentials)
    }

    /// `Content-Type: <media type>`
    #[must_use]
    pub fn content_type(media_type: &MediaType) -> Self {
        Self::new(FieldName::CONTENT_TYPE, media_type.raw_value())
    }

    /// `User-Agent: <agent>`
    #[must_use]
    pub fn user_agent(agent: impl Into<String>) -> Self {
        Self::new(FieldName::USER_AGENT, agent)
    }
}

impl<N: Into<FieldName>, V: Into<String>> From<(N, V)> for HeaderField {
    fn from((name, value): (N, V)) -> Self {
        Self::new(name, value)
    }
}

/// Header fields keyed by case-insensitive name, one value per name.
///
/// Order is not preserved. Cloning copies the storage, so copies never
/// observe each other's changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    storage: HashMap<FieldName, String>,
}

impl Header {
    /// Creates an empty header.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a header from fields, merging repeated names with [`Header::add`].
    #[must_use]
    pub fn from_fields(fields: impl IntoIterator<Item = HeaderField>) -> Self {
        fields.into_iter().collect()
    }

    /// Adds a field; an existing value becomes `"<existing>,<value>"`.
    pub fn add(&mut self, field: HeaderField) {
        match self.storage.entry(field.name) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.push(',');
                existing.push_str(&field.value);
            }
            Entry::Vacant(entry) => {
                entry.insert(field.value);
            }
        }
    }

    /// Sets a field, replacing any existing value.
    pub fn set(&mut self, field: HeaderField) {
        // Drop the old key first so the new casing is the one displayed.
        self.storage.remove(&field.name);
        self.storage.insert(field.name, field.value);
    }

    /// Removes a field, returning it as stored, or `None` if absent.
    pub fn remove(&mut self, name: &FieldName) -> Option<HeaderField> {
        self.storage.remove_entry(name).map(into_field)
    }

    /// Whether a field with this name is present.
    #[must_use]
    pub fn contains(&self, name: &FieldName) -> bool {
        self.storage.contains_key(name)
    }

    /// Value of a field.
    #[must_use]
    pub fn get(&self, name: &FieldName) -> Option<&str> {
        self.storage.get(name).map(String::as_str)
    }

    /// Number of distinct field names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Whether there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Iterates over fields in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &str)> {
        self.storage.iter().map(|(name, value)| (name, value.as_str()))
    }

    /// Plain `name → value` map, names in their display form.
    #[must_use]
    pub fn dictionary_value(&self) -> HashMap<String, String> {
        self.storage
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }
}

impl FromIterator<HeaderField> for Header {
    fn from_iter<I: IntoIterator<Item = HeaderField>>(iter: I) -> Self {
        let mut header = Self::new();
        for field in iter {
            header.add(field);
        }
        header
    }
}

impl Extend<HeaderField> for Header {
    fn extend<I: IntoIterator<Item = HeaderField>>(&mut self, iter: I) {
        for field in iter {
            self.add(field);
        }
    }
}

impl IntoIterator for Header {
    type Item = HeaderField;
    type IntoIter = std::iter::Map<
        std::collections::hash_map::IntoIter<FieldName, String>,
        fn((FieldName, String)) -> HeaderField,
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.storage.into_iter().map(into_field as fn(_) -> _)
    }
}

fn into_field((name, value): (FieldName, String)) -> HeaderField {
    HeaderField { name, value }
}
