//! Declarative HTTP requests for Rust.
//!
//! Describe a request as an immutable [`Request<T>`] value (base URL,
//! endpoint, method, header, query, body, authentication and response
//! decoder), then hand it to a [`TransportExecutor`], which sends it through
//! a [`Transport`] and classifies the outcome into a decoded [`Response<T>`]
//! or a [`TransportError`].
//!
//! # Example
//!
//! ```no_run
//! use courier::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! # async fn run() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let users = Request::<()>::parse("https://api.example.com", "/users")?
//!     .adding_header_field(HeaderField::accept(&MediaType::application_json()))
//!     .authenticated(auth::bearer_token("t0k3n"));
//!
//! let get_user = users
//!     .with_endpoint("/users/42")
//!     .receiving(decoder::json::<User>());
//!
//! let executor = TransportExecutor::builder(HyperTransport::new())
//!     .validate(validate::success_status())
//!     .build();
//!
//! let user = executor.perform(&get_user).await?.into_value();
//! println!("{} is {}", user.id, user.name);
//! # Ok(())
//! # }
//! ```
//!
//! Without the default `hyper` feature, bring your own [`Transport`].

#[cfg(feature = "hyper")]
mod client;
#[cfg(feature = "hyper")]
mod config;
#[cfg(feature = "hyper")]
mod connector;
pub mod context;
mod executor;
pub mod prelude;
pub mod testing;
pub mod validate;

// Re-export executor types
pub use context::{Blocking, ExecutionContext, Inline, Spawn};
pub use executor::{ExecutorBuilder, Outcome, ResponseValidator, TransportExecutor};

// Re-export hyper transport (feature-gated)
#[cfg(feature = "hyper")]
pub use client::{HyperTask, HyperTransport, HyperTransportError};
#[cfg(feature = "hyper")]
pub use config::{HyperConfig, HyperConfigBuilder};

// Re-export core types
pub use courier_core::{
    AuthenticationProvider, BodyProvider, BodyStream, CachePolicy, CaseInsensitiveString,
    DEFAULT_TIMEOUT, DefaultDecoder, Error, FieldName, Header, HeaderField, HttpResponse,
    MediaType, Method, QueryItem, Request, RequestBody, RequestConvertible, Response,
    ResponseDecoder, ResponseMetadata, Result, SharedDecoder, SharedError, StatusCode,
    TextEncoding, Transport, TransportError, TransportReply, TransportRequest,
    TransportRequestBuilder, Url, UrlResponse, auth, body, codec, decoder,
};
