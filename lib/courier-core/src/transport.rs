//! Transport abstraction.
//!
//! A [`Transport`] turns a [`TransportRequest`] into a task: a future that
//! resolves to a [`TransportReply`]. The reply mirrors what a network stack
//! reports: optional body bytes, optional response metadata and an optional
//! error, in any combination. Making sense of the combination is the
//! executor's job.

use std::future::Future;

use bytes::Bytes;

use crate::{Error, HttpResponse, ResponseMetadata, TransportRequest};

/// Executes transport requests.
///
/// Implementations should support connection pooling and honour the
/// request's timeout. The returned task is handed to the executor's task
/// hook before it is awaited.
pub trait Transport: Send + Sync {
    /// In-flight request.
    type Task: Future<Output = TransportReply> + Send + 'static;

    /// Create the task for a request.
    fn task(&self, request: TransportRequest) -> Self::Task;
}

/// Raw outcome of a transport task.
#[derive(Debug, Default)]
pub struct TransportReply {
    /// Body bytes, if any were received.
    pub data: Option<Bytes>,
    /// Response metadata, if a response was received.
    pub response: Option<ResponseMetadata>,
    /// Error, if the transport reported one.
    pub error: Option<Error>,
}

impl TransportReply {
    /// Creates a reply from its parts.
    #[must_use]
    pub const fn new(
        data: Option<Bytes>,
        response: Option<ResponseMetadata>,
        error: Option<Error>,
    ) -> Self {
        Self {
            data,
            response,
            error,
        }
    }

    /// An HTTP response with a body.
    #[must_use]
    pub fn http(response: HttpResponse, data: impl Into<Bytes>) -> Self {
        Self::new(Some(data.into()), Some(response.into()), None)
    }

    /// An HTTP response without a body.
    #[must_use]
    pub fn http_without_data(response: HttpResponse) -> Self {
        Self::new(None, Some(response.into()), None)
    }

    /// A failure before any response arrived.
    #[must_use]
    pub const fn failed(error: Error) -> Self {
        Self::new(None, None, Some(error))
    }

    /// Nothing at all: no data, no response, no error.
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(None, None, None)
    }

    /// Attach response metadata.
    #[must_use]
    pub fn with_response(mut self, response: impl Into<ResponseMetadata>) -> Self {
        self.response = Some(response.into());
        self
    }

    /// Attach an error.
    #[must_use]
    pub fn with_error(mut self, error: Error) -> Self {
        self.error = Some(error);
        self
    }
}
