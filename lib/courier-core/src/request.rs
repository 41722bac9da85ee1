//! Request descriptions and transport requests.
//!
//! A [`Request<T>`] describes a request whose response decodes to `T`. It is
//! an immutable value: every builder method returns a new request and leaves
//! the original untouched. [`RequestConvertible::to_transport_request`] turns
//! it into a [`TransportRequest`] ready for a transport.
//!
//! # Example
//!
//! ```
//! use courier_core::{Method, Request, RequestConvertible, auth, body};
//!
//! let base = "https://api.example.com/v1".parse().unwrap();
//! let request = Request::<String>::new(base, "/users")
//!     .using_method(Method::Post)
//!     .adding_query_item(("dry_run", "true"))
//!     .sending(body::text("hello"))
//!     .authenticated(auth::bearer_token("t0k3n"));
//!
//! let transport_request = request.to_transport_request().unwrap();
//! assert_eq!(
//!     transport_request.url().as_str(),
//!     "https://api.example.com/v1/users?dry_run=true"
//! );
//! assert_eq!(transport_request.header("Authorization"), Some("Bearer t0k3n"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::auth::NoAuthentication;
use crate::body::NoBody;
use crate::decoder::{DefaultDecoder, SharedDecoder};
use crate::query::encode_query;
use crate::{
    AuthenticationProvider, BodyProvider, CachePolicy, Error, Header, HeaderField, Method,
    QueryItem, RequestBody, ResponseDecoder, Result,
};

/// Timeout used when none is set.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

// ============================================================================
// Request Convertible
// ============================================================================

/// Something that can become a [`TransportRequest`] and knows how to decode
/// the response.
///
/// Conversion runs the body and authentication providers. Calling it twice
/// runs them twice; providers with side effects (one-shot tokens, counters)
/// should be converted once per send.
pub trait RequestConvertible: Send + Sync {
    /// Decoded response type.
    type Resource: Send + 'static;

    /// Build the transport request.
    ///
    /// Steps, in order: URL, copy of the header, body provider, authentication
    /// provider, final request. A body provider failure is returned as is.
    fn to_transport_request(&self) -> Result<TransportRequest>;

    /// Decoder for the response.
    fn response_decoder(&self) -> SharedDecoder<Self::Resource>;
}

// ============================================================================
// Request Description
// ============================================================================

/// Immutable description of an HTTP request whose response decodes to `T`.
pub struct Request<T> {
    base_url: Url,
    endpoint: String,
    method: Method,
    header: Header,
    query_items: Vec<QueryItem>,
    cache_policy: CachePolicy,
    timeout: Duration,
    body_provider: Arc<dyn BodyProvider>,
    response_decoder: SharedDecoder<T>,
    authentication_provider: Arc<dyn AuthenticationProvider>,
}

impl<T: DefaultDecoder> Request<T> {
    /// Creates a `GET` request decoded with the default decoder for `T`.
    ///
    /// Only `()`, `String` and `Bytes` have one; use
    /// [`Request::with_decoder`] for anything else.
    #[must_use]
    pub fn new(base_url: Url, endpoint: impl Into<String>) -> Self {
        Self::from_shared_decoder(base_url, endpoint.into(), T::default_decoder())
    }

    /// Like [`Request::new`], parsing the base URL.
    pub fn parse(base_url: &str, endpoint: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::invalid_request_url(format!("{base_url}: {e}")))?;
        Ok(Self::new(base_url, endpoint))
    }
}

impl<T> Request<T> {
    /// Creates a `GET` request with an explicit decoder.
    #[must_use]
    pub fn with_decoder<D>(base_url: Url, endpoint: impl Into<String>, decoder: D) -> Self
    where
        D: ResponseDecoder<Output = T> + 'static,
    {
        Self::from_shared_decoder(base_url, endpoint.into(), Arc::new(decoder))
    }

    fn from_shared_decoder(base_url: Url, endpoint: String, decoder: SharedDecoder<T>) -> Self {
        Self {
            base_url,
            endpoint,
            method: Method::default(),
            header: Header::new(),
            query_items: Vec::new(),
            cache_policy: CachePolicy::default(),
            timeout: DEFAULT_TIMEOUT,
            body_provider: Arc::new(NoBody),
            response_decoder: decoder,
            authentication_provider: Arc::new(NoAuthentication),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Endpoint path appended to the base URL; may be empty.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Explicit header fields, before providers run.
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Query items, in order.
    #[must_use]
    pub fn query_items(&self) -> &[QueryItem] {
        &self.query_items
    }

    /// Cache policy.
    #[must_use]
    pub const fn cache_policy(&self) -> CachePolicy {
        self.cache_policy
    }

    /// Timeout interval.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Copy with another method.
    #[must_use]
    pub fn using_method(&self, method: Method) -> Self {
        let mut request = self.clone();
        request.method = method;
        request
    }

    /// Copy with another endpoint.
    #[must_use]
    pub fn with_endpoint(&self, endpoint: impl Into<String>) -> Self {
        let mut request = self.clone();
        request.endpoint = endpoint.into();
        request
    }

    /// Copy with a field added; an existing value gets `,<value>` appended.
    #[must_use]
    pub fn adding_header_field(&self, field: impl Into<HeaderField>) -> Self {
        let mut request = self.clone();
        request.header.add(field.into());
        request
    }

    /// Copy with a field set, replacing any existing value.
    #[must_use]
    pub fn setting_header_field(&self, field: impl Into<HeaderField>) -> Self {
        let mut request = self.clone();
        request.header.set(field.into());
        request
    }

    /// Copy with the whole header replaced.
    #[must_use]
    pub fn with_header(&self, header: Header) -> Self {
        let mut request = self.clone();
        request.header = header;
        request
    }

    /// Copy with the query items replaced.
    #[must_use]
    pub fn with_query<I>(&self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<QueryItem>,
    {
        let mut request = self.clone();
        request.query_items = items.into_iter().map(Into::into).collect();
        request
    }

    /// Copy with one query item appended.
    #[must_use]
    pub fn adding_query_item(&self, item: impl Into<QueryItem>) -> Self {
        let mut request = self.clone();
        request.query_items.push(item.into());
        request
    }

    /// Copy with the query items replaced by the fields of a value.
    pub fn with_query_params<Q: serde::Serialize + ?Sized>(&self, params: &Q) -> Result<Self> {
        Ok(self.with_query(QueryItem::from_serialize(params)?))
    }

    /// Copy with another cache policy.
    #[must_use]
    pub fn with_cache_policy(&self, cache_policy: CachePolicy) -> Self {
        let mut request = self.clone();
        request.cache_policy = cache_policy;
        request
    }

    /// Copy with another timeout interval.
    #[must_use]
    pub fn timeout_after(&self, timeout: Duration) -> Self {
        let mut request = self.clone();
        request.timeout = timeout;
        request
    }

    /// Copy with another body provider.
    #[must_use]
    pub fn sending(&self, body: impl BodyProvider + 'static) -> Self {
        let mut request = self.clone();
        request.body_provider = Arc::new(body);
        request
    }

    /// Copy with another authentication provider.
    #[must_use]
    pub fn authenticated(&self, provider: impl AuthenticationProvider + 'static) -> Self {
        let mut request = self.clone();
        request.authentication_provider = Arc::new(provider);
        request
    }

    /// Copy decoding the response with another decoder, and so to another type.
    #[must_use]
    pub fn receiving<D>(&self, decoder: D) -> Request<D::Output>
    where
        D: ResponseDecoder + 'static,
    {
        Request {
            base_url: self.base_url.clone(),
            endpoint: self.endpoint.clone(),
            method: self.method,
            header: self.header.clone(),
            query_items: self.query_items.clone(),
            cache_policy: self.cache_policy,
            timeout: self.timeout,
            body_provider: Arc::clone(&self.body_provider),
            response_decoder: Arc::new(decoder),
            authentication_provider: Arc::clone(&self.authentication_provider),
        }
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// The URL the request is sent to.
    ///
    /// An empty endpoint leaves the base URL as is. Otherwise the endpoint is
    /// appended as a path component. Query items replace the query only when
    /// there are some.
    pub fn url(&self) -> Result<Url> {
        let mut url = self.base_url.clone();

        if !self.endpoint.is_empty() {
            if url.cannot_be_a_base() {
                return Err(Error::invalid_request_url(format!(
                    "cannot append `{}` to {url}",
                    self.endpoint
                )));
            }
            let base_path = url.path().trim_end_matches('/');
            let endpoint = self.endpoint.strip_prefix('/').unwrap_or(&self.endpoint);
            let path = format!("{base_path}/{endpoint}");
            url.set_path(&path);
        }

        if !self.query_items.is_empty() {
            url.set_query(Some(&encode_query(&self.query_items)));
        }

        Ok(url)
    }
}

impl<T: Send + 'static> RequestConvertible for Request<T> {
    type Resource = T;

    fn to_transport_request(&self) -> Result<TransportRequest> {
        let url = self.url()?;

        let mut header = self.header.clone();
        let body = self.body_provider.body(&mut header)?;
        self.authentication_provider.update(&mut header);

        Ok(TransportRequest::builder(self.method, url)
            .headers(header.dictionary_value())
            .body(body)
            .cache_policy(self.cache_policy)
            .timeout(self.timeout)
            .build())
    }

    fn response_decoder(&self) -> SharedDecoder<T> {
        Arc::clone(&self.response_decoder)
    }
}

impl<T> Clone for Request<T> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            endpoint: self.endpoint.clone(),
            method: self.method,
            header: self.header.clone(),
            query_items: self.query_items.clone(),
            cache_policy: self.cache_policy,
            timeout: self.timeout,
            body_provider: Arc::clone(&self.body_provider),
            response_decoder: Arc::clone(&self.response_decoder),
            authentication_provider: Arc::clone(&self.authentication_provider),
        }
    }
}

impl<T> fmt::Debug for Request<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("base_url", &self.base_url.as_str())
            .field("endpoint", &self.endpoint)
            .field("method", &self.method)
            .field("header", &self.header)
            .field("query_items", &self.query_items)
            .field("cache_policy", &self.cache_policy)
            .field("timeout", &self.timeout)
            .field("resource", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Transport Request
// ============================================================================

/// A fully assembled request, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    method: Method,
    url: Url,
    headers: HashMap<String, String>,
    body: RequestBody,
    cache_policy: CachePolicy,
    timeout: Duration,
}

impl TransportRequest {
    /// Creates a new [`TransportRequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: Url) -> TransportRequestBuilder {
        TransportRequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Mutable access to headers.
    #[must_use]
    pub fn headers_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.headers
    }

    /// Single header value by name, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Cache policy, for the transport to honour.
    #[must_use]
    pub const fn cache_policy(&self) -> CachePolicy {
        self.cache_policy
    }

    /// Timeout interval, for the transport to enforce.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Consume into (method, url, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, Url, HashMap<String, String>, RequestBody) {
        (self.method, self.url, self.headers, self.body)
    }
}

/// Builder for constructing [`TransportRequest`] instances.
#[derive(Debug, Clone)]
pub struct TransportRequestBuilder {
    method: Method,
    url: Url,
    headers: HashMap<String, String>,
    body: RequestBody,
    cache_policy: CachePolicy,
    timeout: Duration,
}

impl TransportRequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HashMap::new(),
            body: RequestBody::None,
            cache_policy: CachePolicy::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets multiple headers.
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the cache policy.
    #[must_use]
    pub const fn cache_policy(mut self, cache_policy: CachePolicy) -> Self {
        self.cache_policy = cache_policy;
        self
    }

    /// Sets the timeout interval.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the [`TransportRequest`].
    #[must_use]
    pub fn build(self) -> TransportRequest {
        TransportRequest {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
            cache_policy: self.cache_policy,
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use assert2::{check, let_assert};
    use bytes::Bytes;

    use super::*;
    use crate::{FieldName, HttpResponse, MediaType, auth, body, decoder};

    fn base() -> Url {
        Url::parse("https://api.example.com/v1").expect("valid URL")
    }

    fn convert<T: Send + 'static>(request: &Request<T>) -> TransportRequest {
        request.to_transport_request().expect("conversion")
    }

    // ------------------------------------------------------------------------
    // URL
    // ------------------------------------------------------------------------

    #[test]
    fn empty_endpoint_keeps_base_url() {
        let request = Request::<()>::new(base(), "");
        check!(convert(&request).url() == &base());
        check!(
            convert(&request).url().as_str() == "https://api.example.com/v1"
        );
    }

    #[test]
    fn endpoint_is_appended_to_base_path() {
        let request = Request::<()>::new(base(), "/users/42");
        check!(convert(&request).url().path() == "/v1/users/42");
    }

    #[test]
    fn endpoint_without_leading_slash() {
        let request = Request::<()>::new(base(), "users");
        check!(
            convert(&request).url().as_str() == "https://api.example.com/v1/users"
        );
    }

    #[test]
    fn base_with_trailing_slash_is_not_doubled() {
        let base = Url::parse("https://api.example.com/v1/").expect("valid URL");
        let request = Request::<()>::new(base, "/users");
        check!(
            convert(&request).url().as_str() == "https://api.example.com/v1/users"
        );
    }

    #[test]
    fn host_only_base() {
        let request = Request::<()>::parse("https://api.example.com", "/status").expect("parse");
        check!(
            convert(&request).url().as_str() == "https://api.example.com/status"
        );
    }

    #[test]
    fn endpoint_trailing_slash_is_kept() {
        let request = Request::<()>::new(base(), "/users/");
        check!(convert(&request).url().path() == "/v1/users/");
    }

    #[test]
    fn empty_query_adds_no_question_mark() {
        let request = Request::<()>::new(base(), "/users").with_query(Vec::<QueryItem>::new());
        let url = convert(&request).url().clone();
        check!(url.query().is_none());
        check!(!url.as_str().contains('?'));
    }

    #[test]
    fn query_items_keep_input_order() {
        let request = Request::<()>::new(base(), "/search").with_query([
            QueryItem::new("q", "rust"),
            QueryItem::flag("exact"),
            QueryItem::new("page", "2"),
        ]);
        check!(
            convert(&request).url().query() == Some("q=rust&exact&page=2")
        );
    }

    #[test]
    fn query_params_from_struct() {
        #[derive(serde::Serialize)]
        struct Page {
            page: u32,
            per_page: u32,
        }

        let_assert!(
            Ok(request) = Request::<()>::new(base(), "/items").with_query_params(&Page {
                page: 3,
                per_page: 50
            })
        );
        check!(
            convert(&request).url().query() == Some("page=3&per_page=50")
        );
    }

    #[test]
    fn cannot_be_a_base_url_fails() {
        let base = Url::parse("mailto:someone@example.com").expect("valid URL");
        let request = Request::<()>::new(base, "/inbox");
        let_assert!(
            Err(Error::InvalidRequestUrl(_)) = request.to_transport_request()
        );
    }

    #[test]
    fn unparsable_base_url_fails() {
        let_assert!(
            Err(Error::InvalidRequestUrl(message)) = Request::<()>::parse("not a url", "/x")
        );
        check!(message.contains("not a url"));
    }

    // ------------------------------------------------------------------------
    // Header assembly
    // ------------------------------------------------------------------------

    #[test]
    fn defaults() {
        let request = Request::<()>::new(base(), "/users");
        let transport_request = convert(&request);

        check!(transport_request.method() == Method::Get);
        check!(transport_request.headers().is_empty());
        check!(transport_request.body().is_none());
        check!(
            transport_request.cache_policy() == CachePolicy::UseProtocolCachePolicy
        );
        check!(transport_request.timeout() == Duration::from_secs(60));
    }

    #[test]
    fn explicit_fields_reach_the_transport_request() {
        let request = Request::<()>::new(base(), "/users")
            .adding_header_field(("Accept", "text/html"))
            .adding_header_field(("accept", "application/json"))
            .setting_header_field(("X-Request-Id", "abc"));

        let transport_request = convert(&request);
        check!(
            transport_request.header("Accept") == Some("text/html,application/json")
        );
        check!(transport_request.header("x-request-id") == Some("abc"));
    }

    #[test]
    fn default_body_clears_explicit_content_type() {
        let request = Request::<()>::new(base(), "/users")
            .adding_header_field(HeaderField::content_type(&MediaType::text_plain()));
        check!(convert(&request).header("Content-Type").is_none());
    }

    #[test]
    fn json_body_sets_content_type() {
        let request = Request::<()>::new(base(), "/users")
            .using_method(Method::Post)
            .sending(body::json(serde_json::json!({ "name": "Alice" })));

        let transport_request = convert(&request);
        check!(
            transport_request.header("Content-Type") == Some("application/json; charset=utf-8")
        );
        check!(
            transport_request.body() == &RequestBody::Data(Bytes::from(r#"{"name":"Alice"}"#))
        );
    }

    #[test]
    fn body_content_type_replaces_explicit_one() {
        let request = Request::<()>::new(base(), "/notes")
            .adding_header_field(("Content-Type", "application/xml"))
            .sending(body::text("note"));
        check!(
            convert(&request).header("Content-Type") == Some("text/plain; charset=utf-8")
        );
    }

    #[test]
    fn authentication_wins_over_body_provider() {
        let request = Request::<()>::new(base(), "/users")
            .sending(|header: &mut Header| -> Result<RequestBody> {
                header.set(HeaderField::authorization("from-body"));
                Ok(RequestBody::None)
            })
            .authenticated(auth::bearer_token("from-auth"));

        check!(
            convert(&request).header("Authorization") == Some("Bearer from-auth")
        );
    }

    #[test]
    fn body_provider_runs_before_authentication() {
        let calls = Arc::new(Mutex::new(Vec::new()));

        let body_calls = Arc::clone(&calls);
        let auth_calls = Arc::clone(&calls);
        let request = Request::<()>::new(base(), "/upload")
            .sending(move |header: &mut Header| -> Result<RequestBody> {
                body_calls.lock().expect("lock").push("body");
                header.set(HeaderField::new("Content-Type", "text/csv"));
                Ok(RequestBody::Data(Bytes::from_static(b"a,b")))
            })
            .authenticated(move |header: &mut Header| {
                // The body provider's field is already there.
                let seen = header.get(&FieldName::CONTENT_TYPE).unwrap_or("missing");
                auth_calls.lock().expect("lock").push(if seen == "text/csv" {
                    "auth-after-body"
                } else {
                    "auth-before-body"
                });
            });

        let _ = convert(&request);
        check!(
            *calls.lock().expect("lock") == vec!["body", "auth-after-body"]
        );
    }

    #[test]
    fn body_failure_aborts_before_authentication() {
        #[derive(Debug, derive_more::Display, derive_more::Error)]
        #[display("disk on fire")]
        struct DiskOnFire;

        let authenticated = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&authenticated);
        let request = Request::<()>::new(base(), "/upload")
            .sending(|_: &mut Header| -> Result<RequestBody> { Err(Error::custom(DiskOnFire)) })
            .authenticated(move |_: &mut Header| flag.store(true, Ordering::SeqCst));

        let_assert!(Err(err) = request.to_transport_request());
        check!(err.downcast_ref::<DiskOnFire>().is_some());
        check!(!authenticated.load(Ordering::SeqCst));
    }

    #[test]
    fn body_encoding_failure_is_returned_unwrapped() {
        let request = Request::<()>::new(base(), "/notes").sending(body::text_with_encoding(
            "日本語",
            crate::TextEncoding::Latin1,
        ));
        let_assert!(
            Err(Error::TextEncoding { .. }) = request.to_transport_request()
        );
    }

    #[test]
    fn conversion_is_idempotent_for_pure_providers() {
        let request = Request::<String>::new(base(), "/users")
            .using_method(Method::Put)
            .with_query([("a", "1")])
            .sending(body::json(vec![1, 2, 3]))
            .authenticated(auth::basic("user", "pass"));

        check!(convert(&request) == convert(&request));
    }

    #[test]
    fn providers_run_on_every_conversion() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let request = Request::<()>::new(base(), "/").authenticated(move |_: &mut Header| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let _ = convert(&request);
        let _ = convert(&request);
        check!(count.load(Ordering::SeqCst) == 2);
    }

    #[test]
    fn cache_policy_and_timeout_pass_through() {
        let request = Request::<()>::new(base(), "/")
            .with_cache_policy(CachePolicy::ReturnCacheDataDontLoad)
            .timeout_after(Duration::from_millis(1500));

        let transport_request = convert(&request);
        check!(
            transport_request.cache_policy() == CachePolicy::ReturnCacheDataDontLoad
        );
        check!(transport_request.timeout() == Duration::from_millis(1500));
    }

    // ------------------------------------------------------------------------
    // Immutability and decoders
    // ------------------------------------------------------------------------

    #[test]
    fn builder_methods_leave_original_untouched() {
        let original = Request::<()>::new(base(), "/users");
        let modified = original
            .using_method(Method::Delete)
            .adding_header_field(("X-Trace", "1"))
            .with_endpoint("/users/1")
            .timeout_after(Duration::from_secs(5));

        check!(original.method() == Method::Get);
        check!(original.header().is_empty());
        check!(original.endpoint() == "/users");
        check!(original.timeout() == DEFAULT_TIMEOUT);

        check!(modified.method() == Method::Delete);
        check!(modified.endpoint() == "/users/1");
        check!(modified.header().len() == 1);
    }

    #[test]
    fn receiving_changes_the_resource_type() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct User {
            id: u64,
        }

        let request = Request::<()>::new(base(), "/users/1")
            .adding_header_field(HeaderField::accept(&MediaType::application_json()));
        let typed: Request<User> = request.receiving(decoder::json::<User>());

        check!(typed.header() == request.header());
        let response = HttpResponse::new(200, HashMap::new());
        let_assert!(
            Ok(user) = typed.response_decoder().decode(&response, Bytes::from(r#"{"id":1}"#))
        );
        check!(user == User { id: 1 });
    }

    #[test]
    fn explicit_decoder_for_custom_types() {
        let count = |_: &HttpResponse, data: Bytes| -> Result<usize> { Ok(data.len()) };
        let request = Request::with_decoder(base(), "/count", count);
        let response = HttpResponse::new(200, HashMap::new());
        let decoder = request.response_decoder();
        let_assert!(Ok(3) = decoder.decode(&response, Bytes::from("abc")));
    }

    #[test]
    fn transport_request_builder() {
        let url = Url::parse("https://api.example.com/users").expect("valid URL");
        let request = TransportRequest::builder(Method::Post, url)
            .header("Content-Type", "application/json")
            .body(Bytes::from(r#"{"name":"test"}"#))
            .build();

        check!(request.method() == Method::Post);
        check!(request.header("content-type") == Some("application/json"));
        check!(request.body().as_bytes().is_some());
        check!(request.timeout() == DEFAULT_TIMEOUT);
    }
}
