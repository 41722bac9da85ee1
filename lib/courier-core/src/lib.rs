//! Core types and traits for courier, a declarative HTTP request library.
//!
//! This crate provides the pieces a request description is made of:
//! - [`Request`] - Immutable request description, typed by its decoded resource
//! - [`RequestConvertible`] and [`TransportRequest`] - Conversion into a ready-to-send request
//! - [`Header`], [`HeaderField`] and [`FieldName`] - Case-insensitive header fields
//! - [`MediaType`] and [`TextEncoding`] - Content types and text charsets
//! - [`BodyProvider`] and the [`body`] module - Request bodies
//! - [`AuthenticationProvider`] and the [`auth`] module - Credentials
//! - [`ResponseDecoder`] and the [`decoder`] module - Response decoding
//! - [`Transport`] and [`TransportReply`] - The seam to a network stack
//! - [`Error`], [`TransportError`] and [`Result`] - Error handling
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)

pub mod auth;
pub mod body;
mod cache;
mod caseless;
pub mod codec;
pub mod decoder;
mod encoding;
mod error;
mod header;
mod media_type;
mod method;
pub mod prelude;
mod query;
mod request;
mod response;
mod transport;

pub use auth::AuthenticationProvider;
pub use body::{BodyProvider, BodyStream, ByteStream, RequestBody};
pub use cache::CachePolicy;
pub use caseless::CaseInsensitiveString;
pub use decoder::{DefaultDecoder, ResponseDecoder, SharedDecoder};
pub use encoding::TextEncoding;
pub use error::{Error, Result, SharedError, TransportError};
pub use header::{FieldName, Header, HeaderField};
pub use media_type::MediaType;
pub use method::{Method, UnsupportedMethod};
pub use query::{QueryItem, encode_query};
pub use request::{
    DEFAULT_TIMEOUT, Request, RequestConvertible, TransportRequest, TransportRequestBuilder,
};
pub use response::{HttpResponse, Response, ResponseMetadata, UrlResponse};
pub use transport::{Transport, TransportReply};

// Re-export http crate status codes and the URL type
pub use http::StatusCode;
pub use url::Url;
