//! Error types for courier.
//!
//! [`Error`] is the cause of every failure: building a transport request,
//! talking to the transport, or decoding a response. [`TransportError`] is
//! what a perform call reports, the cause plus whatever request and response
//! existed when it happened.

use std::sync::Arc;

use derive_more::{Display, Error, From};

use crate::{HttpResponse, ResponseMetadata, TextEncoding, TransportRequest};

/// Shared, type-erased error, used for transport and caller-supplied failures.
pub type SharedError = Arc<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for courier operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The request URL could not be assembled.
    #[display("invalid request URL: {_0}")]
    #[from(skip)]
    InvalidRequestUrl(#[error(not(source))] String),

    /// A media type string could not be parsed.
    #[display("invalid media type: {_0}")]
    #[from(skip)]
    InvalidMediaType(#[error(not(source))] String),

    /// Text could not be represented in the requested encoding.
    #[display("text is not representable in {encoding}")]
    #[from(skip)]
    TextEncoding {
        /// Target encoding.
        encoding: TextEncoding,
    },

    /// Response bytes are not valid in the expected encoding.
    #[display("response body is not valid {encoding}")]
    #[from(skip)]
    TextDecoding {
        /// Expected encoding.
        encoding: TextEncoding,
    },

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Form URL-encoded serialization error, for bodies and query parameters.
    #[display("form serialization error: {_0}")]
    #[from]
    FormSerialization(serde_html_form::ser::Error),

    /// The transport reported neither a response nor an error.
    #[display("no response")]
    #[from(skip)]
    NoResponse,

    /// The transport answered with something that is not an HTTP response.
    #[display("response is not an HTTP response")]
    #[from(skip)]
    NonHttpResponse,

    /// The response validator rejected the response.
    #[display("unacceptable response (status {status})")]
    #[from(skip)]
    UnacceptableResponse {
        /// HTTP status code.
        status: u16,
    },

    /// An HTTP response arrived without a body where one was expected.
    #[display("no data in response")]
    #[from(skip)]
    NoData,

    /// Error reported by the transport.
    #[display("transport error: {_0}")]
    #[from(skip)]
    Transport(SharedError),

    /// Error raised by a caller-supplied provider, decoder or validator.
    #[display("{_0}")]
    #[from(skip)]
    Custom(SharedError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid request URL error.
    #[must_use]
    pub fn invalid_request_url(message: impl Into<String>) -> Self {
        Self::InvalidRequestUrl(message.into())
    }

    /// Create an invalid media type error.
    #[must_use]
    pub fn invalid_media_type(value: impl Into<String>) -> Self {
        Self::InvalidMediaType(value.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Wrap an error reported by a transport.
    #[must_use]
    pub fn transport(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(error))
    }

    /// Wrap a caller-supplied error.
    #[must_use]
    pub fn custom(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(error))
    }

    /// Returns `true` for [`Error::NoResponse`].
    #[must_use]
    pub const fn is_no_response(&self) -> bool {
        matches!(self, Self::NoResponse)
    }

    /// Returns `true` for [`Error::NonHttpResponse`].
    #[must_use]
    pub const fn is_non_http_response(&self) -> bool {
        matches!(self, Self::NonHttpResponse)
    }

    /// Returns `true` for [`Error::UnacceptableResponse`].
    #[must_use]
    pub const fn is_unacceptable_response(&self) -> bool {
        matches!(self, Self::UnacceptableResponse { .. })
    }

    /// Returns `true` for [`Error::NoData`].
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }

    /// Returns `true` for [`Error::Transport`].
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Downcast a transport or custom error to a concrete type.
    #[must_use]
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Transport(inner) | Self::Custom(inner) => inner.downcast_ref(),
            _ => None,
        }
    }
}

// ============================================================================
// Transport Error
// ============================================================================

/// Failure reported by a perform call.
///
/// Carries the cause, the transport request if one was built, and the
/// response if one was received. No response means the server was never
/// reached (or never answered).
#[derive(Debug, Display, Error)]
#[display("{cause}")]
pub struct TransportError {
    #[error(source)]
    cause: Error,
    request: Option<TransportRequest>,
    response: Option<ResponseMetadata>,
}

impl TransportError {
    /// Creates a transport error.
    #[must_use]
    pub fn new(
        cause: Error,
        request: Option<TransportRequest>,
        response: Option<ResponseMetadata>,
    ) -> Self {
        Self {
            cause,
            request,
            response,
        }
    }

    /// The underlying cause.
    #[must_use]
    pub const fn cause(&self) -> &Error {
        &self.cause
    }

    /// The transport request, if conversion succeeded.
    #[must_use]
    pub const fn request(&self) -> Option<&TransportRequest> {
        self.request.as_ref()
    }

    /// The response, if the transport produced one.
    #[must_use]
    pub const fn response(&self) -> Option<&ResponseMetadata> {
        self.response.as_ref()
    }

    /// The response, if it was an HTTP response.
    #[must_use]
    pub fn http_response(&self) -> Option<&HttpResponse> {
        self.response.as_ref().and_then(ResponseMetadata::as_http)
    }

    /// HTTP status code, if an HTTP response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.http_response().map(HttpResponse::status)
    }

    /// Whether any response came back from the server.
    #[must_use]
    pub const fn reached_server(&self) -> bool {
        self.response.is_some()
    }

    /// Consume into the cause.
    #[must_use]
    pub fn into_cause(self) -> Error {
        self.cause
    }

    /// Consume into (cause, request, response).
    #[must_use]
    pub fn into_parts(self) -> (Error, Option<TransportRequest>, Option<ResponseMetadata>) {
        (self.cause, self.request, self.response)
    }
}
