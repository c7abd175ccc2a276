//! Incoming request accumulator.
//!
//! # Responsibilities
//! - Accumulate raw bytes as they arrive from the socket
//! - Hold the fields the parser derives from the raw buffer
//! - Decide completeness (declared content-length fully received)
//!
//! # Design Decisions
//! - Header names are lower-cased; last write wins
//! - Headers use an insertion-ordered map so iteration is deterministic
//! - Header fields are only final once a blank line has been observed

use indexmap::IndexMap;

/// Mutable request accumulator, populated incrementally as bytes arrive.
///
/// The parser re-derives every parsed field from `raw` on each run, so the
/// struct is safe to re-parse after every append.
#[derive(Debug, Default)]
pub struct Request {
    /// Raw accumulated request text.
    pub raw: String,
    /// Parsed method token (empty until the request line is seen).
    pub method: String,
    /// Parsed request target.
    pub url: String,
    /// Parsed protocol version, e.g. `HTTP/1.1`.
    pub proto: String,
    /// Header fields, lower-cased names, insertion order preserved.
    pub headers: IndexMap<String, String>,
    /// Body text accumulated after the header/body boundary.
    pub body: String,
    /// Running body-length counter, compared against `content-length`.
    pub body_length: usize,
    /// Set once the parser has observed the blank line ending the headers.
    pub(crate) headers_complete: bool,
    /// Set when no plausible request line exists and the whole buffer is
    /// treated as opaque body content.
    pub(crate) opaque_body: bool,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append newly received bytes to the raw buffer.
    pub fn append(&mut self, bytes: &[u8]) {
        self.raw.push_str(&String::from_utf8_lossy(bytes));
    }

    /// Declared `content-length`, defaulting to 0 when absent or non-numeric.
    pub fn content_length(&self) -> usize {
        self.headers
            .get("content-length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// Whether enough bytes have arrived to dispatch the request.
    ///
    /// A structured request is complete once its header block has been
    /// terminated by a blank line and the accumulated body length has reached
    /// the declared content-length. A buffer with no plausible request line
    /// dispatches as soon as any bytes exist (no headers, so the declared
    /// length is 0).
    pub fn is_complete(&self) -> bool {
        if self.raw.is_empty() {
            return false;
        }
        if self.opaque_body {
            return true;
        }
        self.headers_complete && self.body_length >= self.content_length()
    }

    /// Clear every parsed field ahead of a full re-parse of `raw`.
    pub(crate) fn reset_parsed(&mut self) {
        self.method.clear();
        self.url.clear();
        self.proto.clear();
        self.headers.clear();
        self.body.clear();
        self.body_length = 0;
        self.headers_complete = false;
        self.opaque_body = false;
    }
}
