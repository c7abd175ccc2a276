//! Response header serialization.
//!
//! # Responsibilities
//! - Emit the status line from protocol, status code and reason phrase
//! - Merge default headers with user-set headers (user wins)
//! - Compute content-length from the actual body size
//!
//! # Design Decisions
//! - Pure function of the Response; never mutates it, so building twice
//!   yields identical output
//! - A status code with no registered reason phrase is an error rather than
//!   a malformed status line

use thiserror::Error;

use crate::http::response::Response;

/// Status code with no registered reason phrase.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("no reason phrase registered for status code {0}")]
pub struct StatusCodeError(pub u16);

/// Build the full header block for a response, terminated by a blank line.
///
/// Default headers are emitted only where no user header of the same name
/// exists; `content-length` is always computed from the body's byte length.
/// User headers follow verbatim, in insertion order. The caller concatenates
/// the body to form the full payload.
pub fn build_header(response: &Response) -> Result<String, StatusCodeError> {
    let reason =
        Response::reason_phrase(response.status).ok_or(StatusCodeError(response.status))?;

    let mut header = format!("{} {} {}\r\n", response.proto, response.status, reason);

    for (name, value) in response.default_headers() {
        if response.headers.contains_key(name) {
            continue;
        }
        if name == "content-length" {
            header.push_str(&format!("{}: {}\r\n", name, response.body.len()));
        } else {
            header.push_str(&format!("{}: {}\r\n", name, value));
        }
    }

    for (name, value) in &response.headers {
        header.push_str(&format!("{}: {}\r\n", name, value));
    }

    header.push_str("\r\n");
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with(status: u16, body: &str) -> Response {
        let mut response = Response::new();
        response.status = status;
        response.proto = "HTTP/1.1".to_string();
        response.body = body.to_string();
        response
    }

    #[test]
    fn status_line_first() {
        let header = build_header(&response_with(200, "")).unwrap();
        assert!(header.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(header.ends_with("\r\n\r\n"));
    }

    #[test]
    fn content_length_computed_from_body() {
        let header = build_header(&response_with(200, "hello")).unwrap();
        assert!(header.contains("content-length: 5\r\n"));
    }

    #[test]
    fn build_is_idempotent() {
        let mut response = response_with(404, "missing");
        response.set_header("x-served-by", "cascade");
        let first = build_header(&response).unwrap();
        let second = build_header(&response).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn user_header_suppresses_default() {
        let mut response = response_with(200, "");
        response.set_header("content-type", "application/json");
        let header = build_header(&response).unwrap();
        assert!(header.contains("content-type: application/json\r\n"));
        assert!(!header.contains("text/plain"));
    }

    #[test]
    fn user_headers_emitted_verbatim_in_order() {
        let mut response = response_with(200, "");
        response.set_header("X-First", "1");
        response.set_header("X-Second", "2");
        let header = build_header(&response).unwrap();
        let first = header.find("X-First: 1\r\n").unwrap();
        let second = header.find("X-Second: 2\r\n").unwrap();
        assert!(first < second);
    }

    #[test]
    fn unknown_status_code_is_an_error() {
        let err = build_header(&response_with(999, "")).unwrap_err();
        assert_eq!(err, StatusCodeError(999));
    }
}
