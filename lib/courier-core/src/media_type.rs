//! Media types (MIME types).
//!
//! [`MediaType`] compares on `type/subtype` only, ignoring case and
//! parameters, so `text/plain; charset=utf-8` equals `TEXT/Plain`.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::{CaseInsensitiveString, Error, TextEncoding};

/// A media type such as `application/json; charset=utf-8`.
///
/// Parameters are kept sorted by name, so [`MediaType::raw_value`] is stable.
///
/// # Example
///
/// ```
/// use courier_core::MediaType;
///
/// let json = MediaType::application_json().with_charset("utf-8");
/// assert_eq!(json.raw_value(), "application/json; charset=utf-8");
/// assert_eq!(json, "APPLICATION/JSON".parse().unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct MediaType {
    top_level: CaseInsensitiveString,
    sub_type: CaseInsensitiveString,
    parameters: BTreeMap<String, String>,
}

impl MediaType {
    /// Creates a media type without parameters.
    #[must_use]
    pub fn new(top_level: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            top_level: CaseInsensitiveString::new(top_level.into()),
            sub_type: CaseInsensitiveString::new(sub_type.into()),
            parameters: BTreeMap::new(),
        }
    }

    const fn from_static(top_level: &'static str, sub_type: &'static str) -> Self {
        Self {
            top_level: CaseInsensitiveString::from_static(top_level),
            sub_type: CaseInsensitiveString::from_static(sub_type),
            parameters: BTreeMap::new(),
        }
    }

    /// `application/json`
    #[must_use]
    pub const fn application_json() -> Self {
        Self::from_static("application", "json")
    }

    /// `application/octet-stream`
    #[must_use]
    pub const fn application_octet_stream() -> Self {
        Self::from_static("application", "octet-stream")
    }

    /// `application/x-www-form-urlencoded`
    #[must_use]
    pub const fn application_form_urlencoded() -> Self {
        Self::from_static("application", "x-www-form-urlencoded")
    }

    /// `text/plain`
    #[must_use]
    pub const fn text_plain() -> Self {
        Self::from_static("text", "plain")
    }

    /// Adds or replaces a parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Adds or replaces the `charset` parameter.
    #[must_use]
    pub fn with_charset(self, charset: impl Into<String>) -> Self {
        self.with_parameter("charset", charset)
    }

    /// Top-level type, e.g. `application`.
    #[must_use]
    pub fn top_level_type(&self) -> &str {
        self.top_level.as_str()
    }

    /// Subtype, e.g. `json`.
    #[must_use]
    pub fn sub_type(&self) -> &str {
        self.sub_type.as_str()
    }

    /// Parameters, keyed by lowercase name.
    #[must_use]
    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// A single parameter value, looked up ignoring case.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The text encoding named by the `charset` parameter, if known.
    #[must_use]
    pub fn encoding(&self) -> Option<TextEncoding> {
        self.parameter("charset").and_then(TextEncoding::from_label)
    }

    /// Serialized form: `type/subtype; k=v; ...`.
    #[must_use]
    pub fn raw_value(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for MediaType {
    fn eq(&self, other: &Self) -> bool {
        self.top_level == other.top_level && self.sub_type == other.sub_type
    }
}

impl Eq for MediaType {}

impl Hash for MediaType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.top_level.hash(state);
        self.sub_type.hash(state);
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.top_level, self.sub_type)?;
        for (name, value) in &self.parameters {
            write!(f, "; {name}={value}")?;
        }
        Ok(())
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::invalid_media_type(s);

        let mut sections = s.split(';');
        let essence = sections.next().unwrap_or_default().trim();
        let (top_level, sub_type) = essence.split_once('/').ok_or_else(invalid)?;
        let (top_level, sub_type) = (top_level.trim(), sub_type.trim());
        if top_level.is_empty() || sub_type.is_empty() {
            return Err(invalid());
        }

        let mut media_type = Self::new(top_level, sub_type);
        for section in sections.map(str::trim).filter(|s| !s.is_empty()) {
            let (name, value) = section.split_once('=').ok_or_else(invalid)?;
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            media_type = media_type.with_parameter(name.trim(), value);
        }

        Ok(media_type)
    }
}
