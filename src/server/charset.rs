//! Filename translation between the wire and the host filesystem.
//!
//! Many legacy Windows clients put GBK bytes on the wire, so that is the
//! default; `OPTS UTF8 ON` switches a session to UTF-8 passthrough.

use encoding_rs::GBK;

/// The wire encoding of filenames for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WireCharset {
    Gbk,
    Utf8,
}

impl WireCharset {
    /// Decodes request bytes to Unicode for host filesystem calls.
    /// Malformed sequences become U+FFFD instead of failing the command.
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            WireCharset::Gbk => GBK.decode(bytes).0.into_owned(),
            WireCharset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    /// Encodes a host filename for directory listings on the wire.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            WireCharset::Gbk => GBK.encode(text).0.into_owned(),
            WireCharset::Utf8 => text.as_bytes().to_vec(),
        }
    }
}
