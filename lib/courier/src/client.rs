//! HTTP transport implementation using hyper-util.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use courier_core::{
    CachePolicy, Error, HttpResponse, RequestBody, Transport, TransportReply, TransportRequest,
};
use derive_more::{Display, Error};
use futures_util::TryStreamExt;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, trace};

use crate::{HyperConfig, HyperConfigBuilder, connector::https_connector};

// ============================================================================
// Errors
// ============================================================================

/// Failures reported by [`HyperTransport`], wrapped in
/// [`Error::Transport`](courier_core::Error::Transport).
#[derive(Debug, Display, Error)]
pub enum HyperTransportError {
    /// Connection failed or was interrupted.
    #[display("connection error: {_0}")]
    Connection(#[error(not(source))] String),

    /// TLS handshake or certificate failure.
    #[display("TLS error: {_0}")]
    Tls(#[error(not(source))] String),

    /// No response head within the request's timeout interval.
    #[display("request timed out after {_0:?}")]
    Timeout(#[error(not(source))] Duration),

    /// The request could not be mapped to an HTTP request.
    #[display("invalid request: {_0}")]
    InvalidRequest(#[error(not(source))] String),

    /// Reading the request or response body failed.
    #[display("body error: {_0}")]
    Body(#[error(not(source))] String),

    /// The task was aborted.
    #[display("request cancelled")]
    Cancelled,
}

fn failed(error: HyperTransportError) -> TransportReply {
    TransportReply::failed(Error::transport(error))
}

// ============================================================================
// Task
// ============================================================================

/// In-flight request of a [`HyperTransport`].
///
/// The request runs as its own Tokio task from the moment it is created.
/// Aborting it through [`HyperTask::abort_handle`] makes it resolve to
/// [`HyperTransportError::Cancelled`].
#[derive(Debug)]
pub struct HyperTask {
    handle: JoinHandle<TransportReply>,
}

impl HyperTask {
    /// Handle to cancel the request.
    #[must_use]
    pub fn abort_handle(&self) -> AbortHandle {
        self.handle.abort_handle()
    }
}

impl Future for HyperTask {
    type Output = TransportReply;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle)
            .poll(cx)
            .map(|result| match result {
                Ok(reply) => reply,
                Err(err) if err.is_cancelled() => failed(HyperTransportError::Cancelled),
                Err(err) => std::panic::resume_unwind(err.into_panic()),
            })
    }
}

// ============================================================================
// Transport
// ============================================================================

/// HTTP transport using hyper-util with connection pooling and rustls TLS.
///
/// Stream bodies are collected in memory before sending. The request's
/// timeout bounds the wait for the response head. Cache policies asking to
/// bypass caches add `Cache-Control: no-cache` unless the request already
/// sets `Cache-Control`; there is no local cache to consult otherwise.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use courier::{HyperConfig, HyperTransport};
///
/// let transport = HyperTransport::with_config(
///     HyperConfig::builder()
///         .connect_timeout(Duration::from_secs(3))
///         .build(),
/// );
/// ```
#[derive(Clone)]
pub struct HyperTransport {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    config: HyperConfig,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Create a new transport with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(HyperConfig::default())
    }

    /// Create a new transport with custom configuration.
    #[must_use]
    pub fn with_config(config: HyperConfig) -> Self {
        let connector = https_connector(&config);

        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(connector);

        Self { inner, config }
    }

    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> HyperConfigBuilder {
        HyperConfig::builder()
    }

    /// Get the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &HyperConfig {
        &self.config
    }

    async fn send(&self, request: TransportRequest) -> TransportReply {
        let url = request.url().clone();
        let timeout = request.timeout();

        let hyper_request = match Self::build_hyper_request(request).await {
            Ok(hyper_request) => hyper_request,
            Err(err) => return failed(err),
        };

        let in_flight = self.inner.request(hyper_request);
        let response = match tokio::time::timeout(timeout, in_flight).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => return failed(Self::map_hyper_error(&err)),
            Err(_) => return failed(HyperTransportError::Timeout(timeout)),
        };

        let status = response.status().as_u16();
        let headers = Self::extract_headers(response.headers());
        let http = HttpResponse::new(status, headers).with_url(url);
        trace!(status, "response head received");

        match response.into_body().collect().await {
            Ok(body) => {
                let data = body.to_bytes();
                debug!(status, bytes = data.len(), "response received");
                TransportReply::http(http, data)
            }
            Err(err) => TransportReply::http_without_data(http)
                .with_error(Error::transport(HyperTransportError::Body(err.to_string()))),
        }
    }

    /// Build a hyper request from a transport request.
    async fn build_hyper_request(
        request: TransportRequest,
    ) -> Result<http::Request<Full<Bytes>>, HyperTransportError> {
        let cache_policy = request.cache_policy();
        let (method, url, headers, body) = request.into_parts();

        let mut builder = http::Request::builder()
            .method(http::Method::from(method))
            .uri(url.as_str());

        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let explicit_cache_control = headers
            .keys()
            .any(|name| name.eq_ignore_ascii_case("cache-control"));
        if Self::bypasses_cache(cache_policy) && !explicit_cache_control {
            builder = builder.header(http::header::CACHE_CONTROL, "no-cache");
        }

        let body = Self::collect_body(body).await?;
        builder
            .body(Full::new(body))
            .map_err(|e| HyperTransportError::InvalidRequest(e.to_string()))
    }

    async fn collect_body(body: RequestBody) -> Result<Bytes, HyperTransportError> {
        match body {
            RequestBody::None => Ok(Bytes::new()),
            RequestBody::Data(data) => Ok(data),
            RequestBody::Stream(stream) => {
                let stream = stream.take().ok_or_else(|| {
                    HyperTransportError::Body("stream body was already consumed".to_string())
                })?;
                let chunks: Vec<Bytes> = stream
                    .try_collect()
                    .await
                    .map_err(|e| HyperTransportError::Body(e.to_string()))?;
                trace!(chunks = chunks.len(), "stream body collected");
                Ok(Bytes::from(chunks.concat()))
            }
        }
    }

    const fn bypasses_cache(policy: CachePolicy) -> bool {
        matches!(
            policy,
            CachePolicy::ReloadIgnoringLocalCacheData
                | CachePolicy::ReloadIgnoringLocalAndRemoteCacheData
                | CachePolicy::ReloadRevalidatingCacheData
        )
    }

    /// Extract response headers as a `HashMap`; repeated fields are joined
    /// with a comma.
    fn extract_headers(headers: &http::HeaderMap) -> HashMap<String, String> {
        let mut extracted: HashMap<String, String> = HashMap::new();
        for (name, value) in headers {
            let Ok(value) = value.to_str() else {
                continue;
            };
            extracted
                .entry(name.to_string())
                .and_modify(|existing| {
                    existing.push(',');
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }
        extracted
    }

    fn map_hyper_error(err: &hyper_util::client::legacy::Error) -> HyperTransportError {
        let msg = err.to_string();

        if err.is_connect() {
            return HyperTransportError::Connection(msg);
        }

        if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
            return HyperTransportError::Tls(msg);
        }

        HyperTransportError::Connection(msg)
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HyperTransport {
    type Task = HyperTask;

    fn task(&self, request: TransportRequest) -> HyperTask {
        debug!(method = %request.method(), url = %request.url(), "spawning hyper request");
        let transport = self.clone();
        HyperTask {
            handle: tokio::spawn(async move { transport.send(request).await }),
        }
    }
}
