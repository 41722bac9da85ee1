//! Response decoders.
//!
//! A [`ResponseDecoder`] turns the HTTP response and its body bytes into the
//! request's resource type. `()`, `String` and `Bytes` resources get a
//! decoder by default (see [`DefaultDecoder`]); any other type needs one
//! spelled out.

use std::marker::PhantomData;
use std::sync::Arc;

use bytes::Bytes;

use crate::codec::{Decoder, JsonCodec};
use crate::{Error, HttpResponse, Result, TextEncoding};

/// Decodes a response body into a value.
///
/// Any `Fn(&HttpResponse, Bytes) -> Result<T>` is a decoder.
pub trait ResponseDecoder: Send + Sync {
    /// Decoded type.
    type Output;

    /// Decode the body.
    fn decode(&self, response: &HttpResponse, data: Bytes) -> Result<Self::Output>;

    /// Whether decoding needs body bytes.
    ///
    /// When `false`, a response without a body is decoded with empty bytes
    /// instead of failing with [`Error::NoData`]. Decoders producing `()`
    /// never get body bytes, whatever this returns.
    fn requires_data(&self) -> bool {
        true
    }
}

impl<F, T> ResponseDecoder for F
where
    F: Fn(&HttpResponse, Bytes) -> Result<T> + Send + Sync,
{
    type Output = T;

    fn decode(&self, response: &HttpResponse, data: Bytes) -> Result<T> {
        self(response, data)
    }
}

/// Shared decoder, as stored by a request.
pub type SharedDecoder<T> = Arc<dyn ResponseDecoder<Output = T>>;

/// Resource types with a built-in decoder.
pub trait DefaultDecoder: Sized + 'static {
    /// Decoder used when none is given.
    fn default_decoder() -> SharedDecoder<Self>;
}

impl DefaultDecoder for () {
    fn default_decoder() -> SharedDecoder<Self> {
        Arc::new(NoneDecoder)
    }
}

impl DefaultDecoder for String {
    fn default_decoder() -> SharedDecoder<Self> {
        Arc::new(TextDecoder::default())
    }
}

impl DefaultDecoder for Bytes {
    fn default_decoder() -> SharedDecoder<Self> {
        Arc::new(DataDecoder)
    }
}

/// Ignores the body; decodes to `()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneDecoder;

impl ResponseDecoder for NoneDecoder {
    type Output = ();

    fn decode(&self, _response: &HttpResponse, _data: Bytes) -> Result<()> {
        Ok(())
    }

    fn requires_data(&self) -> bool {
        false
    }
}

/// Returns the body bytes as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataDecoder;

impl ResponseDecoder for DataDecoder {
    type Output = Bytes;

    fn decode(&self, _response: &HttpResponse, data: Bytes) -> Result<Bytes> {
        Ok(data)
    }
}

/// Decodes the body as text in a fixed encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextDecoder {
    encoding: TextEncoding,
}

impl ResponseDecoder for TextDecoder {
    type Output = String;

    fn decode(&self, _response: &HttpResponse, data: Bytes) -> Result<String> {
        self.encoding.decode(&data).ok_or(Error::TextDecoding {
            encoding: self.encoding,
        })
    }
}

/// Decodes the body with a [`Decoder`], JSON by default.
pub struct JsonDecoder<T, D = JsonCodec> {
    decoder: D,
    _marker: PhantomData<fn() -> T>,
}

impl<T, D: std::fmt::Debug> std::fmt::Debug for JsonDecoder<T, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonDecoder")
            .field("decoder", &self.decoder)
            .field("output", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T, D: Clone> Clone for JsonDecoder<T, D> {
    fn clone(&self) -> Self {
        Self {
            decoder: self.decoder.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, D> ResponseDecoder for JsonDecoder<T, D>
where
    T: serde::de::DeserializeOwned,
    D: Decoder,
{
    type Output = T;

    fn decode(&self, _response: &HttpResponse, data: Bytes) -> Result<T> {
        self.decoder.decode(&data)
    }
}

/// Ignores the body.
#[must_use]
pub const fn none() -> NoneDecoder {
    NoneDecoder
}

/// Raw body bytes.
#[must_use]
pub const fn data() -> DataDecoder {
    DataDecoder
}

/// UTF-8 text.
#[must_use]
pub const fn text() -> TextDecoder {
    text_with_encoding(TextEncoding::Utf8)
}

/// Text in a given encoding; fails on bytes invalid in it.
#[must_use]
pub const fn text_with_encoding(encoding: TextEncoding) -> TextDecoder {
    TextDecoder { encoding }
}

/// JSON with the default [`JsonCodec`].
#[must_use]
pub const fn json<T: serde::de::DeserializeOwned>() -> JsonDecoder<T> {
    json_with(JsonCodec::new())
}

/// A value decoded with a given decoder.
#[must_use]
pub const fn json_with<T: serde::de::DeserializeOwned, D: Decoder>(
    decoder: D,
) -> JsonDecoder<T, D> {
    JsonDecoder {
        decoder,
        _marker: PhantomData,
    }
}
