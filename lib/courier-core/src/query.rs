//! Query items.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::Result;

/// Characters escaped in query names and values.
///
/// Everything but unreserved characters and the sub-delimiters that carry no
/// meaning inside a query. `&`, `=`, `+` and `#` are escaped so that a value
/// cannot split or end the query.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'!')
    .remove(b'$')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b',')
    .remove(b';')
    .remove(b':')
    .remove(b'@')
    .remove(b'/')
    .remove(b'?');

/// A `name=value` query item; the value is optional (`?flag`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryItem {
    /// Item name.
    pub name: String,
    /// Item value, `None` for a bare name.
    pub value: Option<String>,
}

impl QueryItem {
    /// Creates a `name=value` item.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Creates a bare `name` item.
    #[must_use]
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// Items from a serializable value, in field order.
    ///
    /// Uses `serde_html_form`, so `Vec<T>` fields become repeated items and
    /// `None` fields can be skipped with `skip_serializing_if`.
    pub fn from_serialize<T: serde::Serialize + ?Sized>(value: &T) -> Result<Vec<Self>> {
        let encoded = serde_html_form::to_string(value)?;
        Ok(url::form_urlencoded::parse(encoded.as_bytes())
            .map(|(name, value)| Self::new(name, value))
            .collect())
    }
}

impl<N: Into<String>, V: Into<String>> From<(N, V)> for QueryItem {
    fn from((name, value): (N, V)) -> Self {
        Self::new(name, value)
    }
}

/// Percent-encoded query string, items joined with `&` in order.
#[must_use]
pub fn encode_query(items: &[QueryItem]) -> String {
    items
        .iter()
        .map(|item| {
            let name = utf8_percent_encode(&item.name, QUERY_COMPONENT);
            match &item.value {
                Some(value) => format!("{name}={}", utf8_percent_encode(value, QUERY_COMPONENT)),
                None => name.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}
