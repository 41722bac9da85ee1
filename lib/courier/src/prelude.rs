//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and modules for easy
//! glob importing:
//!
//! ```
//! use courier::prelude::*;
//! ```

pub use crate::{
    CachePolicy, Error, Header, HeaderField, HttpResponse, MediaType, Method, QueryItem, Request,
    RequestConvertible, Response, Result, StatusCode, TransportError, TransportExecutor, auth,
    body, decoder, validate,
};
#[cfg(feature = "hyper")]
pub use crate::{HyperConfig, HyperTransport};
pub use serde::{Deserialize, Serialize};
