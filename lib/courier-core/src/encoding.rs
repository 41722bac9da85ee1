//! Text encodings for text bodies and text decoders.

use bytes::Bytes;
use derive_more::Display;

/// Character encoding used to turn text into bytes and back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
pub enum TextEncoding {
    /// UTF-8.
    #[default]
    #[display("utf-8")]
    Utf8,
    /// 7-bit US-ASCII.
    #[display("us-ascii")]
    Ascii,
    /// ISO-8859-1, one byte per code point up to U+00FF.
    #[display("iso-8859-1")]
    Latin1,
}

impl TextEncoding {
    /// IANA charset name, as used in a `charset` media type parameter.
    #[must_use]
    pub const fn iana_name(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Ascii => "us-ascii",
            Self::Latin1 => "iso-8859-1",
        }
    }

    /// Looks up an encoding by charset label, ignoring case.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        [
            (Self::Utf8, &["utf-8", "utf8"][..]),
            (Self::Ascii, &["us-ascii", "ascii"][..]),
            (Self::Latin1, &["iso-8859-1", "latin1", "l1"][..]),
        ]
        .into_iter()
        .find(|(_, labels)| labels.iter().any(|l| l.eq_ignore_ascii_case(label)))
        .map(|(encoding, _)| encoding)
    }

    /// Encodes text, or `None` if a character is not representable.
    #[must_use]
    pub fn encode(&self, text: &str) -> Option<Bytes> {
        match self {
            Self::Utf8 => Some(Bytes::copy_from_slice(text.as_bytes())),
            Self::Ascii => text
                .is_ascii()
                .then(|| Bytes::copy_from_slice(text.as_bytes())),
            Self::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).ok())
                .collect::<Option<Vec<u8>>>()
                .map(Bytes::from),
        }
    }

    /// Decodes bytes, or `None` if they are not valid in this encoding.
    #[must_use]
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Self::Ascii => bytes
                .is_ascii()
                .then(|| bytes.iter().map(|&b| char::from(b)).collect()),
            Self::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}
