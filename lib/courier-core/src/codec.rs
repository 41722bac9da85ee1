//! Serialization codecs for JSON bodies and JSON decoders.
//!
//! Body providers and response decoders take the codec as a value, so callers
//! can swap in their own [`Encoder`] / [`Decoder`] implementations.

use bytes::Bytes;

use crate::Result;

/// Turns a value into body bytes.
pub trait Encoder: Send + Sync + 'static {
    /// Encode a value.
    fn encode<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<Bytes>;
}

/// Turns response bytes into a value.
pub trait Decoder: Send + Sync + 'static {
    /// Decode a value.
    fn decode<T: serde::de::DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;
}

/// JSON codec backed by `serde_json`.
///
/// Decoding goes through `serde_path_to_error`, so failures name the field
/// that did not match (e.g. `user.address.city`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Compact output.
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Pretty-printed output.
    #[must_use]
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Encoder for JsonCodec {
    fn encode<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<Bytes> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        encoded.map(Bytes::from).map_err(Into::into)
    }
}

impl Decoder for JsonCodec {
    fn decode<T: serde::de::DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        let mut deserializer = serde_json::Deserializer::from_slice(bytes);
        serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
            crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
        })
    }
}
