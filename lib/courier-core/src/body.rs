//! Request bodies and body providers.
//!
//! A [`BodyProvider`] produces the [`RequestBody`] and adjusts the header to
//! match, usually by setting `Content-Type`. Built-in providers finish every
//! fallible step before touching the header, so a provider that fails leaves
//! the header as it found it.
//!
//! # Example
//!
//! ```
//! use courier_core::{BodyProvider, FieldName, Header, body};
//!
//! let mut header = Header::new();
//! let provider = body::json(serde_json::json!({ "name": "Alice" }));
//! let request_body = provider.body(&mut header).unwrap();
//!
//! assert!(request_body.as_bytes().is_some());
//! assert_eq!(
//!     header.get(&FieldName::CONTENT_TYPE),
//!     Some("application/json; charset=utf-8")
//! );
//! ```

use std::fmt;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use futures_core::Stream;

use crate::codec::{Encoder, JsonCodec};
use crate::{Error, FieldName, Header, HeaderField, MediaType, Result, TextEncoding};

// ============================================================================
// Request Body
// ============================================================================

/// Boxed stream of body chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// Shared handle on a streamed body.
///
/// Clones share the same stream, and equality is identity: two handles are
/// equal only if they point at the same stream. The stream itself can be
/// taken once, by whoever sends it.
#[derive(Clone)]
pub struct BodyStream {
    inner: Arc<Mutex<Option<ByteStream>>>,
}

impl BodyStream {
    /// Wraps a stream of chunks.
    pub fn new(stream: impl Stream<Item = io::Result<Bytes>> + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(Box::pin(stream)))),
        }
    }

    /// Takes the stream out, leaving the handle empty.
    #[must_use]
    pub fn take(&self) -> Option<ByteStream> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Whether the stream was already taken.
    #[must_use]
    pub fn is_taken(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl PartialEq for BodyStream {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for BodyStream {}

impl fmt::Debug for BodyStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyStream")
            .field("taken", &self.is_taken())
            .finish_non_exhaustive()
    }
}

/// Body of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    /// No body.
    #[default]
    None,
    /// In-memory bytes.
    Data(Bytes),
    /// Streamed body.
    Stream(BodyStream),
}

impl RequestBody {
    /// Returns `true` if there is no body.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// In-memory bytes, if any.
    #[must_use]
    pub const fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Data(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Stream handle, if any.
    #[must_use]
    pub const fn as_stream(&self) -> Option<&BodyStream> {
        match self {
            Self::Stream(stream) => Some(stream),
            _ => None,
        }
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        Self::Data(bytes)
    }
}

impl From<BodyStream> for RequestBody {
    fn from(stream: BodyStream) -> Self {
        Self::Stream(stream)
    }
}

// ============================================================================
// Body Provider
// ============================================================================

/// Produces a request body, updating the header to describe it.
///
/// Implementations may fail. Header changes should happen only after every
/// fallible step succeeded, so that a failure leaves the header untouched.
///
/// Any `Fn(&mut Header) -> Result<RequestBody>` is a body provider.
///
/// ```
/// use courier_core::{BodyProvider, Header, HeaderField, RequestBody, Result};
///
/// let provider = |header: &mut Header| -> Result<RequestBody> {
///     header.set(HeaderField::new("Content-Type", "text/csv"));
///     Ok(RequestBody::Data("a,b\n1,2\n".into()))
/// };
///
/// let mut header = Header::new();
/// assert!(provider.body(&mut header).is_ok());
/// ```
pub trait BodyProvider: Send + Sync {
    /// Produce the body.
    fn body(&self, header: &mut Header) -> Result<RequestBody>;
}

impl<F> BodyProvider for F
where
    F: Fn(&mut Header) -> Result<RequestBody> + Send + Sync,
{
    fn body(&self, header: &mut Header) -> Result<RequestBody> {
        self(header)
    }
}

/// No body: removes `Content-Type`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBody;

impl BodyProvider for NoBody {
    fn body(&self, header: &mut Header) -> Result<RequestBody> {
        header.remove(&FieldName::CONTENT_TYPE);
        Ok(RequestBody::None)
    }
}

/// Raw bytes or stream with an explicit content type.
#[derive(Debug, Clone)]
pub struct RawBody {
    body: RequestBody,
    content_type: MediaType,
}

impl BodyProvider for RawBody {
    fn body(&self, header: &mut Header) -> Result<RequestBody> {
        header.set(HeaderField::content_type(&self.content_type));
        Ok(self.body.clone())
    }
}

/// Text encoded with a [`TextEncoding`], sent as `text/plain`.
#[derive(Debug, Clone)]
pub struct TextBody {
    text: String,
    encoding: TextEncoding,
}

impl BodyProvider for TextBody {
    fn body(&self, header: &mut Header) -> Result<RequestBody> {
        let bytes = self.encoding.encode(&self.text).ok_or(Error::TextEncoding {
            encoding: self.encoding,
        })?;
        let content_type = MediaType::text_plain().with_charset(self.encoding.iana_name());
        header.set(HeaderField::content_type(&content_type));
        Ok(RequestBody::Data(bytes))
    }
}

/// A value serialized with an [`Encoder`], sent as `application/json`.
#[derive(Debug, Clone)]
pub struct JsonBody<T, E = JsonCodec> {
    value: T,
    encoder: E,
}

impl<T, E> BodyProvider for JsonBody<T, E>
where
    T: serde::Serialize + Send + Sync,
    E: Encoder,
{
    fn body(&self, header: &mut Header) -> Result<RequestBody> {
        let bytes = self.encoder.encode(&self.value)?;
        let content_type = MediaType::application_json().with_charset("utf-8");
        header.set(HeaderField::content_type(&content_type));
        Ok(RequestBody::Data(bytes))
    }
}

/// A value serialized as `application/x-www-form-urlencoded`.
///
/// Uses `serde_html_form`, so `Vec<T>` fields become repeated keys
/// (`tags=a&tags=b`).
#[derive(Debug, Clone)]
pub struct FormBody<T> {
    value: T,
}

impl<T> BodyProvider for FormBody<T>
where
    T: serde::Serialize + Send + Sync,
{
    fn body(&self, header: &mut Header) -> Result<RequestBody> {
        let encoded = serde_html_form::to_string(&self.value)?;
        header.set(HeaderField::content_type(
            &MediaType::application_form_urlencoded(),
        ));
        Ok(RequestBody::Data(Bytes::from(encoded)))
    }
}

// ============================================================================
// Constructors
// ============================================================================

/// No body; removes `Content-Type`.
#[must_use]
pub const fn none() -> NoBody {
    NoBody
}

/// Raw bytes sent as `application/octet-stream`.
#[must_use]
pub fn raw(bytes: impl Into<Bytes>) -> RawBody {
    raw_with_type(bytes, MediaType::application_octet_stream())
}

/// Raw bytes with a given content type.
#[must_use]
pub fn raw_with_type(bytes: impl Into<Bytes>, content_type: MediaType) -> RawBody {
    RawBody {
        body: RequestBody::Data(bytes.into()),
        content_type,
    }
}

/// Streamed body sent as `application/octet-stream`.
#[must_use]
pub fn stream(stream: BodyStream) -> RawBody {
    stream_with_type(stream, MediaType::application_octet_stream())
}

/// Streamed body with a given content type.
#[must_use]
pub fn stream_with_type(stream: BodyStream, content_type: MediaType) -> RawBody {
    RawBody {
        body: RequestBody::Stream(stream),
        content_type,
    }
}

/// UTF-8 text sent as `text/plain; charset=utf-8`.
#[must_use]
pub fn text(text: impl Into<String>) -> TextBody {
    text_with_encoding(text, TextEncoding::Utf8)
}

/// Text in a given encoding; fails if the text is not representable in it.
#[must_use]
pub fn text_with_encoding(text: impl Into<String>, encoding: TextEncoding) -> TextBody {
    TextBody {
        text: text.into(),
        encoding,
    }
}

/// A value serialized to JSON with the default [`JsonCodec`].
#[must_use]
pub fn json<T: serde::Serialize>(value: T) -> JsonBody<T> {
    json_with(value, JsonCodec::new())
}

/// A value serialized with a given encoder.
#[must_use]
pub fn json_with<T: serde::Serialize, E: Encoder>(value: T, encoder: E) -> JsonBody<T, E> {
    JsonBody { value, encoder }
}

/// A value serialized as a URL-encoded form.
#[must_use]
pub fn form<T: serde::Serialize>(value: T) -> FormBody<T> {
    FormBody { value }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use assert2::{check, let_assert};

    use super::*;

    fn content_type(header: &Header) -> Option<&str> {
        header.get(&FieldName::CONTENT_TYPE)
    }

    #[test]
    fn none_removes_content_type() {
        let mut header = Header::from_fields([
            HeaderField::new("content-type", "text/plain"),
            HeaderField::new("Accept", "*/*"),
        ]);

        let_assert!(Ok(body) = none().body(&mut header));
        check!(body == RequestBody::None);
        check!(content_type(&header).is_none());
        check!(header.contains(&FieldName::ACCEPT));
    }

    #[test]
    fn raw_defaults_to_octet_stream() {
        let mut header = Header::new();
        let_assert!(Ok(body) = raw(&b"\x00\x01"[..]).body(&mut header));
        check!(body.as_bytes().map(Bytes::as_ref) == Some(&b"\x00\x01"[..]));
        check!(content_type(&header) == Some("application/octet-stream"));
    }

    #[test]
    fn raw_with_explicit_type_overrides_header() {
        let mut header = Header::from_fields([HeaderField::new("Content-Type", "text/plain")]);
        let provider = raw_with_type("<a/>", MediaType::new("application", "xml"));
        let_assert!(Ok(_) = provider.body(&mut header));
        check!(content_type(&header) == Some("application/xml"));
    }

    #[test]
    fn stream_body_keeps_identity() {
        let handle = BodyStream::new(futures_util::stream::iter(vec![Ok(Bytes::from("chunk"))]));
        let mut header = Header::new();

        let_assert!(Ok(body) = stream(handle.clone()).body(&mut header));
        check!(body == RequestBody::Stream(handle.clone()));
        check!(content_type(&header) == Some("application/octet-stream"));

        let other = BodyStream::new(futures_util::stream::empty());
        check!(RequestBody::Stream(other) != RequestBody::Stream(handle));
    }

    #[test]
    fn stream_can_be_taken_once() {
        let handle = BodyStream::new(futures_util::stream::empty());
        check!(!handle.is_taken());
        check!(handle.take().is_some());
        check!(handle.is_taken());
        check!(handle.take().is_none());
    }

    #[test]
    fn text_sets_charset() {
        let mut header = Header::new();
        let_assert!(Ok(body) = text("héllo").body(&mut header));
        check!(
            body.as_bytes().map(Bytes::as_ref) == Some("héllo".as_bytes())
        );
        check!(content_type(&header) == Some("text/plain; charset=utf-8"));
    }

    #[test]
    fn text_failure_leaves_header_untouched() {
        let mut header = Header::from_fields([HeaderField::new("Content-Type", "application/xml")]);
        let provider = text_with_encoding("naïve", TextEncoding::Ascii);

        let_assert!(
            Err(Error::TextEncoding { encoding }) = provider.body(&mut header)
        );
        check!(encoding == TextEncoding::Ascii);
        check!(content_type(&header) == Some("application/xml"));
    }

    #[test]
    fn json_sets_content_type() {
        let mut header = Header::new();
        let_assert!(
            Ok(body) = json(BTreeMap::from([("id", 1)])).body(&mut header)
        );
        check!(
            body.as_bytes().map(Bytes::as_ref) == Some(&br#"{"id":1}"#[..])
        );
        check!(
            content_type(&header) == Some("application/json; charset=utf-8")
        );
    }

    #[test]
    fn json_failure_leaves_header_untouched() {
        let mut header = Header::new();
        let provider = json(BTreeMap::from([((1, 2), "tuple key")]));

        let_assert!(
            Err(Error::JsonSerialization(_)) = provider.body(&mut header)
        );
        check!(header.is_empty());
    }

    #[test]
    fn form_encodes_fields() {
        #[derive(serde::Serialize)]
        struct Login {
            username: String,
            password: String,
        }

        let mut header = Header::new();
        let provider = form(Login {
            username: "alice".to_string(),
            password: "s3cret".to_string(),
        });

        let_assert!(Ok(body) = provider.body(&mut header));
        check!(
            body.as_bytes().map(Bytes::as_ref) == Some(&b"username=alice&password=s3cret"[..])
        );
        check!(
            content_type(&header) == Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn closures_are_providers() {
        let provider = |header: &mut Header| -> Result<RequestBody> {
            header.set(HeaderField::new("Content-Type", "text/csv"));
            Ok(RequestBody::Data(Bytes::from_static(b"a,b")))
        };

        let mut header = Header::new();
        let_assert!(Ok(_) = provider.body(&mut header));
        check!(content_type(&header) == Some("text/csv"));
    }
}
