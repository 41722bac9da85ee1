//! Response validators.
//!
//! A validator looks at the HTTP response before decoding. `Ok(false)` fails
//! the perform with [`Error::UnacceptableResponse`](courier_core::Error::UnacceptableResponse);
//! `Err` fails it with that error.

use std::ops::RangeBounds;

use courier_core::{HttpResponse, Result};

/// Accepts 2xx responses.
#[must_use]
pub fn success_status() -> impl Fn(&HttpResponse) -> Result<bool> + Send + Sync + Clone + 'static {
    |response: &HttpResponse| Ok(response.is_success())
}

/// Accepts responses whose status falls in `range`.
///
/// ```
/// use courier::validate::status_in;
/// use courier::HttpResponse;
///
/// let validator = status_in(200..400);
/// assert!(validator(&HttpResponse::new(304, Default::default())).unwrap());
/// assert!(!validator(&HttpResponse::new(404, Default::default())).unwrap());
/// ```
#[must_use]
pub fn status_in<R>(range: R) -> impl Fn(&HttpResponse) -> Result<bool> + Send + Sync + 'static
where
    R: RangeBounds<u16> + Send + Sync + 'static,
{
    move |response: &HttpResponse| Ok(range.contains(&response.status()))
}
