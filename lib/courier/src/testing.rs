//! Test double for [`Transport`].
//!
//! [`StubTransport`] answers every request with a reply built by a closure
//! and records the requests it received. Inject one per test.

use std::collections::HashMap;
use std::future::{Ready, ready};
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use courier_core::{Error, HttpResponse, Transport, TransportReply, TransportRequest};

type Responder = dyn Fn(&TransportRequest) -> TransportReply + Send + Sync;

/// A transport that never touches the network.
///
/// ```
/// use courier::testing::StubTransport;
/// use courier::{Request, TransportExecutor, Url};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let stub = StubTransport::http(200, "hello");
/// let executor = TransportExecutor::new(stub.clone());
///
/// let request = Request::<String>::new(Url::parse("https://example.com").unwrap(), "/greeting");
/// let response = executor.perform(&request).await.unwrap();
///
/// assert_eq!(response.value(), "hello");
/// assert_eq!(stub.requests()[0].url().path(), "/greeting");
/// # }
/// ```
#[derive(Clone)]
pub struct StubTransport {
    responder: Arc<Responder>,
    requests: Arc<Mutex<Vec<TransportRequest>>>,
}

impl StubTransport {
    /// Reply with whatever `responder` builds for each request.
    #[must_use]
    pub fn new(
        responder: impl Fn(&TransportRequest) -> TransportReply + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Arc::new(responder),
            requests: Arc::default(),
        }
    }

    /// Reply with an HTTP response carrying `data`.
    #[must_use]
    pub fn http(status: u16, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self::new(move |request| {
            let url = request.url().clone();
            let response = HttpResponse::new(status, HashMap::new()).with_url(url);
            TransportReply::http(response, data.clone())
        })
    }

    /// Reply with an HTTP response without a body.
    #[must_use]
    pub fn http_without_data(status: u16) -> Self {
        Self::new(move |_| {
            let response = HttpResponse::new(status, HashMap::new());
            TransportReply::http_without_data(response)
        })
    }

    /// Fail every request before any response, with the error `error` builds.
    #[must_use]
    pub fn failing(error: impl Fn() -> Error + Send + Sync + 'static) -> Self {
        Self::new(move |_| TransportReply::failed(error()))
    }

    /// Requests received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.lock().clone()
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<TransportRequest>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for StubTransport {
    type Task = Ready<TransportReply>;

    fn task(&self, request: TransportRequest) -> Self::Task {
        let reply = (self.responder)(&request);
        self.lock().push(request);
        ready(reply)
    }
}

impl std::fmt::Debug for StubTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StubTransport")
            .field("requests", &self.request_count())
            .finish_non_exhaustive()
    }
}
