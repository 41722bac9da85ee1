//! Transport executor.
//!
//! [`TransportExecutor`] sends a request description through a [`Transport`]
//! and classifies what comes back into exactly one outcome: a decoded
//! [`Response`] or a [`TransportError`].
//!
//! # Example
//!
//! ```no_run
//! use courier::{Request, TransportExecutor, HyperTransport, validate};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let executor = TransportExecutor::builder(HyperTransport::new())
//!     .validate(validate::success_status())
//!     .build();
//!
//! let request = Request::<String>::parse("https://api.example.com", "/status")?;
//! let response = executor.perform(&request).await?;
//! println!("{}: {}", response.status(), response.value());
//! # Ok(())
//! # }
//! ```

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use courier_core::{
    Error, HttpResponse, RequestConvertible, Response, ResponseMetadata, Result, SharedDecoder,
    Transport, TransportError, TransportReply, TransportRequest,
};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{Instrument, Level, debug, info, span, warn};

use crate::context::{ExecutionContext, Inline};

/// Response validator: `Ok(false)` rejects the response.
pub type ResponseValidator = Arc<dyn Fn(&HttpResponse) -> Result<bool> + Send + Sync>;

type TaskHook<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Outcome of a perform call.
pub type Outcome<T> = std::result::Result<Response<T>, TransportError>;

/// A failure cause with whatever response was received.
type Failure = (Error, Option<ResponseMetadata>);

// ============================================================================
// Executor
// ============================================================================

/// Sends requests through a transport and classifies the outcome.
///
/// Classification, first match wins:
///
/// 1. conversion failed: its error, nothing sent
/// 2. no response and an error: that error
/// 3. no response and no error: [`Error::NoResponse`]
/// 4. a response that is not HTTP: [`Error::NonHttpResponse`]
/// 5. an HTTP response and an error: that error
/// 6. the validator rejects the response: [`Error::UnacceptableResponse`]
/// 7. decoding: [`Error::NoData`] when bytes are required and missing,
///    the decoder's error, or the decoded [`Response`]
pub struct TransportExecutor<X: Transport> {
    transport: Arc<X>,
    decode_context: Arc<dyn ExecutionContext>,
    callback_context: Arc<dyn ExecutionContext>,
    on_task: Option<TaskHook<X::Task>>,
    validator: Option<ResponseValidator>,
}

impl<X: Transport> TransportExecutor<X> {
    /// Executor with inline decoding and delivery, no hook and no validator.
    #[must_use]
    pub fn new(transport: X) -> Self {
        Self::builder(transport).build()
    }

    /// Create a new executor builder.
    #[must_use]
    pub fn builder(transport: X) -> ExecutorBuilder<X> {
        ExecutorBuilder::new(transport)
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &X {
        &self.transport
    }

    /// Send a request and wait for its outcome.
    ///
    /// The request is converted once, so body and authentication providers
    /// run once per call.
    pub async fn perform<R>(&self, request: &R) -> Outcome<R::Resource>
    where
        R: RequestConvertible + ?Sized,
    {
        let transport_request = match request.to_transport_request() {
            Ok(transport_request) => transport_request,
            Err(cause) => {
                warn!(error = %cause, "request conversion failed");
                return Err(TransportError::new(cause, None, None));
            }
        };

        let method = transport_request.method();
        let url = transport_request.url().to_string();
        let span = span!(Level::INFO, "http_request", %method, %url);

        self.execute(transport_request, request.response_decoder())
            .instrument(span)
            .await
    }

    /// Send a request in the background and hand the outcome to `callback`.
    ///
    /// The callback runs on the callback context. Must be called from within
    /// a Tokio runtime.
    pub fn perform_with<R, F>(&self, request: R, callback: F) -> JoinHandle<()>
    where
        R: RequestConvertible + 'static,
        F: FnOnce(Outcome<R::Resource>) + Send + 'static,
        X: 'static,
    {
        let executor = self.clone();
        tokio::spawn(async move {
            let outcome = executor.perform(&request).await;
            executor
                .callback_context
                .execute(Box::new(move || callback(outcome)));
        })
    }

    async fn execute<T: Send + 'static>(
        &self,
        request: TransportRequest,
        decoder: SharedDecoder<T>,
    ) -> Outcome<T> {
        let start = Instant::now();
        debug!(headers = ?redacted(request.headers()), "sending request");

        let task = self.transport.task(request.clone());
        if let Some(hook) = &self.on_task {
            hook(&task);
        }
        let reply = task.await;

        let result = self
            .classify(reply, decoder)
            .await
            .map_err(|(cause, response)| TransportError::new(cause, Some(request), response));

        let elapsed = start.elapsed();
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        match &result {
            Ok(response) => info!(status = response.status(), elapsed_ms, "request completed"),
            Err(err) => warn!(error = %err, status = ?err.status(), elapsed_ms, "request failed"),
        }

        result
    }

    async fn classify<T: Send + 'static>(
        &self,
        reply: TransportReply,
        decoder: SharedDecoder<T>,
    ) -> std::result::Result<Response<T>, Failure> {
        let TransportReply {
            data,
            response,
            error,
        } = reply;

        let Some(response) = response else {
            return Err((error.unwrap_or(Error::NoResponse), None));
        };
        let http = match response {
            ResponseMetadata::Http(http) => http,
            other @ ResponseMetadata::Other(_) => {
                return Err((Error::NonHttpResponse, Some(other)));
            }
        };
        if let Some(error) = error {
            return Err((error, Some(http.into())));
        }

        if let Some(validator) = &self.validator {
            match validator(&http) {
                Ok(true) => {}
                Ok(false) => {
                    let status = http.status();
                    return Err((Error::UnacceptableResponse { status }, Some(http.into())));
                }
                Err(error) => return Err((error, Some(http.into()))),
            }
        }

        // A unit resource never reads the body, whatever decoder produces it.
        let needs_data = TypeId::of::<T>() != TypeId::of::<()>() && decoder.requires_data();
        let data = if needs_data {
            match data {
                Some(data) => data,
                None => return Err((Error::NoData, Some(http.into()))),
            }
        } else {
            Bytes::new()
        };

        match self.decode(decoder, http.clone(), data).await {
            Ok(value) => Ok(Response::new(http, value)),
            Err(error) => Err((error, Some(http.into()))),
        }
    }

    async fn decode<T: Send + 'static>(
        &self,
        decoder: SharedDecoder<T>,
        http: HttpResponse,
        data: Bytes,
    ) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.decode_context.execute(Box::new(move || {
            let _ = tx.send(decoder.decode(&http, data));
        }));
        rx.await.map_err(Error::custom)?
    }
}

impl<X: Transport> Clone for TransportExecutor<X> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            decode_context: Arc::clone(&self.decode_context),
            callback_context: Arc::clone(&self.callback_context),
            on_task: self.on_task.clone(),
            validator: self.validator.clone(),
        }
    }
}

impl<X: Transport + fmt::Debug> fmt::Debug for TransportExecutor<X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportExecutor")
            .field("transport", &self.transport)
            .field("on_task", &self.on_task.is_some())
            .field("validator", &self.validator.is_some())
            .finish_non_exhaustive()
    }
}

/// Header fields for logging, credentials masked.
fn redacted(headers: &HashMap<String, String>) -> HashMap<&str, &str> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if is_sensitive(name) {
                "<redacted>"
            } else {
                value.as_str()
            };
            (name.as_str(), value)
        })
        .collect()
}

fn is_sensitive(name: &str) -> bool {
    ["authorization", "proxy-authorization", "cookie"]
        .iter()
        .any(|sensitive| name.eq_ignore_ascii_case(sensitive))
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`TransportExecutor`].
pub struct ExecutorBuilder<X: Transport> {
    transport: X,
    decode_context: Option<Arc<dyn ExecutionContext>>,
    callback_context: Option<Arc<dyn ExecutionContext>>,
    on_task: Option<TaskHook<X::Task>>,
    validator: Option<ResponseValidator>,
}

impl<X: Transport> ExecutorBuilder<X> {
    /// Create a new builder.
    #[must_use]
    pub fn new(transport: X) -> Self {
        Self {
            transport,
            decode_context: None,
            callback_context: None,
            on_task: None,
            validator: None,
        }
    }

    /// Run response decoding on `context` (default: inline).
    #[must_use]
    pub fn decode_on(mut self, context: impl ExecutionContext + 'static) -> Self {
        self.decode_context = Some(Arc::new(context));
        self
    }

    /// Deliver [`TransportExecutor::perform_with`] outcomes on `context`
    /// (default: inline).
    #[must_use]
    pub fn deliver_on(mut self, context: impl ExecutionContext + 'static) -> Self {
        self.callback_context = Some(Arc::new(context));
        self
    }

    /// Inspect each transport task once created, before it is awaited.
    ///
    /// The executor keeps no handle to the task; grab one here to cancel it.
    #[must_use]
    pub fn on_task(mut self, hook: impl Fn(&X::Task) + Send + Sync + 'static) -> Self {
        self.on_task = Some(Arc::new(hook));
        self
    }

    /// Validate HTTP responses before decoding.
    #[must_use]
    pub fn validate(
        mut self,
        validator: impl Fn(&HttpResponse) -> Result<bool> + Send + Sync + 'static,
    ) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Build the executor.
    #[must_use]
    pub fn build(self) -> TransportExecutor<X> {
        TransportExecutor {
            transport: Arc::new(self.transport),
            decode_context: self.decode_context.unwrap_or_else(|| Arc::new(Inline)),
            callback_context: self.callback_context.unwrap_or_else(|| Arc::new(Inline)),
            on_task: self.on_task,
            validator: self.validator,
        }
    }
}

impl<X: Transport + fmt::Debug> fmt::Debug for ExecutorBuilder<X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutorBuilder")
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}
