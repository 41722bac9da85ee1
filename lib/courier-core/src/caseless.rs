//! Case-insensitive strings.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A string compared, hashed and ordered ignoring ASCII case.
///
/// The original casing is kept for display, so `Content-Type` stays
/// `Content-Type` when rendered even if it was looked up as `content-type`.
///
/// # Example
///
/// ```
/// use courier_core::CaseInsensitiveString;
///
/// let a = CaseInsensitiveString::new("Content-Type");
/// let b = CaseInsensitiveString::new("CONTENT-TYPE");
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "Content-Type");
/// ```
#[derive(Debug, Clone)]
pub struct CaseInsensitiveString(Cow<'static, str>);

impl CaseInsensitiveString {
    /// Wraps an owned or borrowed string.
    #[must_use]
    pub fn new(value: impl Into<Cow<'static, str>>) -> Self {
        Self(value.into())
    }

    /// Wraps a static string, usable in constants.
    #[must_use]
    pub const fn from_static(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }

    /// The string with its original casing.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase form, the identity used for comparisons.
    #[must_use]
    pub fn to_lowercase(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    /// Consumes into the original string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0.into_owned()
    }
}

impl PartialEq for CaseInsensitiveString {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for CaseInsensitiveString {}

impl PartialEq<str> for CaseInsensitiveString {
    fn eq(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl PartialEq<&str> for CaseInsensitiveString {
    fn eq(&self, other: &&str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl Hash for CaseInsensitiveString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
        // Same terminator as `str`, keeps ("ab", "c") and ("a", "bc") apart.
        state.write_u8(0xff);
    }
}

impl Ord for CaseInsensitiveString {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.0.bytes().map(|b| b.to_ascii_lowercase());
        let rhs = other.0.bytes().map(|b| b.to_ascii_lowercase());
        lhs.cmp(rhs)
    }
}

impl PartialOrd for CaseInsensitiveString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CaseInsensitiveString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CaseInsensitiveString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for CaseInsensitiveString {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for CaseInsensitiveString {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl From<CaseInsensitiveString> for String {
    fn from(value: CaseInsensitiveString) -> Self {
        value.into_string()
    }
}
