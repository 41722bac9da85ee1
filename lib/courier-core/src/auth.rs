//! Authentication providers.
//!
//! An [`AuthenticationProvider`] writes credentials into the header. It runs
//! after the body provider, so its fields win over any field of the same
//! name the body provider set.

use std::fmt;
use std::sync::Arc;

use base64::Engine;

use crate::{Header, HeaderField};

/// Adds authentication fields to a header. Cannot fail.
///
/// Any `Fn(&mut Header)` is an authentication provider.
pub trait AuthenticationProvider: Send + Sync {
    /// Update the header in place.
    fn update(&self, header: &mut Header);
}

impl<F> AuthenticationProvider for F
where
    F: Fn(&mut Header) + Send + Sync,
{
    fn update(&self, header: &mut Header) {
        self(header);
    }
}

/// Leaves the header unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuthentication;

impl AuthenticationProvider for NoAuthentication {
    fn update(&self, _header: &mut Header) {}
}

/// `Authorization: Bearer <token>`.
#[derive(Clone)]
pub struct BearerToken {
    token: Arc<str>,
}

impl AuthenticationProvider for BearerToken {
    fn update(&self, header: &mut Header) {
        header.set(HeaderField::authorization(format!("Bearer {}", self.token)));
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken").finish_non_exhaustive()
    }
}

/// `Authorization: Basic <base64(username:password)>`.
#[derive(Clone)]
pub struct BasicAuth {
    /// Base64-encoded "username:password".
    encoded_credentials: Arc<str>,
}

impl BasicAuth {
    /// Encodes the credentials once, up front.
    #[must_use]
    pub fn new(username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        let credentials = format!("{}:{}", username.as_ref(), password.as_ref());
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
        Self {
            encoded_credentials: Arc::from(encoded),
        }
    }
}

impl AuthenticationProvider for BasicAuth {
    fn update(&self, header: &mut Header) {
        header.set(HeaderField::authorization(format!(
            "Basic {}",
            self.encoded_credentials
        )));
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth").finish_non_exhaustive()
    }
}

/// Sets an arbitrary field, e.g. an API key header.
#[derive(Debug, Clone)]
pub struct FieldAuthentication {
    field: HeaderField,
}

impl AuthenticationProvider for FieldAuthentication {
    fn update(&self, header: &mut Header) {
        header.set(self.field.clone());
    }
}

/// No authentication.
#[must_use]
pub const fn none() -> NoAuthentication {
    NoAuthentication
}

/// Bearer token authentication.
#[must_use]
pub fn bearer_token(token: impl Into<String>) -> BearerToken {
    BearerToken {
        token: Arc::from(token.into()),
    }
}

/// HTTP basic authentication.
#[must_use]
pub fn basic(username: impl AsRef<str>, password: impl AsRef<str>) -> BasicAuth {
    BasicAuth::new(username, password)
}

/// Authentication through a single header field.
#[must_use]
pub fn header_field(field: HeaderField) -> FieldAuthentication {
    FieldAuthentication { field }
}
