//! Outgoing response container.
//!
//! # Responsibilities
//! - Hold status, protocol, echoed method, headers and body for one response
//! - Pre-populate overridable default headers
//! - Map status codes to reason phrases
//!
//! # Design Decisions
//! - Status 0 means "not yet decided by any handler"; the server substitutes
//!   200 after dispatch
//! - Default headers are emitted only where no user header of the same name
//!   exists; content-length is always computed from the body at build time
//! - Both header maps preserve insertion order for deterministic output

use indexmap::IndexMap;

/// Response under construction by the middleware chain.
///
/// Once serialized and written to the client the response is final and the
/// owning connection is torn down.
#[derive(Debug)]
pub struct Response {
    /// Status code; 0 until a handler decides one.
    pub status: u16,
    /// Protocol string echoed from the request.
    pub proto: String,
    /// Method echoed from the request.
    pub method: String,
    /// User-set header fields, emitted verbatim.
    pub headers: IndexMap<String, String>,
    /// Default header fields, each overridable by a user header.
    default_headers: IndexMap<String, String>,
    /// Response body text.
    pub body: String,
}

impl Response {
    pub fn new() -> Self {
        let mut default_headers = IndexMap::new();
        default_headers.insert("content-length".to_string(), "0".to_string());
        default_headers.insert(
            "content-type".to_string(),
            "text/plain; charset=utf-8".to_string(),
        );
        default_headers.insert("connection".to_string(), "close".to_string());

        Self {
            status: 0,
            proto: String::new(),
            method: String::new(),
            headers: IndexMap::new(),
            default_headers,
            body: String::new(),
        }
    }

    /// Set a user header, overriding any default of the same name.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    /// Iterate the default header fields in insertion order.
    pub fn default_headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.default_headers
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Reason phrase for a status code, if one is registered.
    pub fn reason_phrase(status: u16) -> Option<&'static str> {
        let phrase = match status {
            100 => "Continue",
            101 => "Switching Protocols",
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            203 => "Non-Authoritative Information",
            204 => "No Content",
            205 => "Reset Content",
            206 => "Partial Content",
            300 => "Multiple Choices",
            301 => "Moved Permanently",
            302 => "Found",
            303 => "See Other",
            304 => "Not Modified",
            307 => "Temporary Redirect",
            308 => "Permanent Redirect",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            406 => "Not Acceptable",
            408 => "Request Timeout",
            409 => "Conflict",
            410 => "Gone",
            411 => "Length Required",
            412 => "Precondition Failed",
            413 => "Payload Too Large",
            414 => "URI Too Long",
            415 => "Unsupported Media Type",
            417 => "Expectation Failed",
            418 => "I'm a teapot",
            426 => "Upgrade Required",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            501 => "Not Implemented",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            505 => "HTTP Version Not Supported",
            _ => return None,
        };
        Some(phrase)
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_starts_unset() {
        assert_eq!(Response::new().status, 0);
    }

    #[test]
    fn defaults_cover_required_headers() {
        let response = Response::new();
        let names: Vec<&str> = response.default_headers().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["content-length", "content-type", "connection"]);
    }

    #[test]
    fn reason_phrases() {
        assert_eq!(Response::reason_phrase(200), Some("OK"));
        assert_eq!(Response::reason_phrase(404), Some("Not Found"));
        assert_eq!(Response::reason_phrase(999), None);
    }
}
