//! Prelude module for convenient imports.
//!
//! ```
//! use courier_core::prelude::*;
//! ```

pub use crate::{
    AuthenticationProvider, BodyProvider, CachePolicy, Error, Header, HeaderField, HttpResponse,
    MediaType, Method, QueryItem, Request, RequestConvertible, Response, ResponseDecoder, Result,
    Transport, TransportError, TransportReply, TransportRequest, auth, body, decoder,
};
