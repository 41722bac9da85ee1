//! Response metadata and decoded responses.
//!
//! A transport reports [`ResponseMetadata`]: either an [`HttpResponse`] or some
//! other kind of response ([`UrlResponse`]). A successful perform yields a
//! [`Response<T>`], the HTTP response together with the decoded value.

use std::collections::HashMap;

use url::Url;

// ============================================================================
// Response Metadata
// ============================================================================

/// Status line and headers of an HTTP response, without the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    status: u16,
    url: Option<Url>,
    headers: HashMap<String, String>,
}

impl HttpResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>) -> Self {
        Self {
            status,
            url: None,
            headers,
        }
    }

    /// Sets the URL the response came from.
    #[must_use]
    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// URL the response came from, if known.
    #[must_use]
    pub const fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .or_else(|| {
                self.headers
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value)
            })
            .map(String::as_str)
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 3xx.
    #[must_use]
    pub const fn is_redirection(&self) -> bool {
        self.status >= 300 && self.status < 400
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }
}

/// A response that is not HTTP-shaped (e.g. from a `file:` or `data:` URL).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlResponse {
    /// URL the response came from.
    pub url: Option<Url>,
    /// MIME type reported for the content.
    pub mime_type: Option<String>,
}

/// Whatever a transport reported as the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseMetadata {
    /// An HTTP response.
    Http(HttpResponse),
    /// Any other kind of response.
    Other(UrlResponse),
}

impl ResponseMetadata {
    /// The HTTP response, if this is one.
    #[must_use]
    pub const fn as_http(&self) -> Option<&HttpResponse> {
        match self {
            Self::Http(response) => Some(response),
            Self::Other(_) => None,
        }
    }

    /// Consume into the HTTP response, or give back the metadata.
    pub fn into_http(self) -> Result<HttpResponse, Self> {
        match self {
            Self::Http(response) => Ok(response),
            other @ Self::Other(_) => Err(other),
        }
    }
}

impl From<HttpResponse> for ResponseMetadata {
    fn from(response: HttpResponse) -> Self {
        Self::Http(response)
    }
}

impl From<UrlResponse> for ResponseMetadata {
    fn from(response: UrlResponse) -> Self {
        Self::Other(response)
    }
}

// ============================================================================
// Decoded Response
// ============================================================================

/// A successful outcome: the HTTP response and the decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<T> {
    http: HttpResponse,
    value: T,
}

impl<T> Response<T> {
    /// Creates a response.
    #[must_use]
    pub const fn new(http: HttpResponse, value: T) -> Self {
        Self { http, value }
    }

    /// HTTP response metadata.
    #[must_use]
    pub const fn http(&self) -> &HttpResponse {
        &self.http
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.http.status()
    }

    /// Decoded value.
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Consume into the decoded value.
    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }

    /// Consume into (response, value).
    #[must_use]
    pub fn into_parts(self) -> (HttpResponse, T) {
        (self.http, self.value)
    }

    /// Transform the value with a function.
    pub fn map<F, U>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            http: self.http,
            value: f(self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_basic() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        let response = HttpResponse::new(200, headers);

        assert_eq!(response.status(), 200);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert!(response.header("Accept").is_none());
        assert!(response.is_success());
        assert!(!response.is_client_error());
        assert!(!response.is_server_error());
    }

    #[test]
    fn response_status_checks() {
        assert!(HttpResponse::new(301, HashMap::new()).is_redirection());
        assert!(HttpResponse::new(404, HashMap::new()).is_client_error());
        assert!(HttpResponse::new(500, HashMap::new()).is_server_error());
    }

    #[test]
    fn metadata_classification() {
        let http = ResponseMetadata::from(HttpResponse::new(204, HashMap::new()));
        assert_eq!(http.as_http().map(HttpResponse::status), Some(204));

        let other = ResponseMetadata::from(UrlResponse {
            url: Url::parse("file:///tmp/data.bin").ok(),
            mime_type: Some("application/octet-stream".to_string()),
        });
        assert!(other.as_http().is_none());
        assert!(other.into_http().is_err());
    }

    #[test]
    fn response_map() {
        let response = Response::new(HttpResponse::new(200, HashMap::new()), "test");
        let mapped = response.map(str::len);

        assert_eq!(mapped.status(), 200);
        assert_eq!(*mapped.value(), 4);
    }
}
