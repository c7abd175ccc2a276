//! Wire-to-object HTTP parser.
//!
//! # Responsibilities
//! - Turn the accumulated raw buffer into request-line, headers and body
//! - Run after every append; signal completeness via the Request's fields
//! - Fall back to opaque body content when no request line is present
//!
//! # Design Decisions
//! - Single pass over the lines with one in-body flag
//! - Each run re-derives everything from the full buffer, so parsing is
//!   idempotent for a given buffer state
//! - Header lines split on the first colon only; names lower-cased, values
//!   trimmed, last write wins
//! - Body length is a simple running sum of appended line lengths

use crate::http::request::Request;

/// Parse the request's raw buffer in place.
///
/// Never fails: a buffer without a plausible request line is treated as
/// opaque body content, not as an error. Completeness is the caller's check
/// via [`Request::is_complete`].
pub fn parse(request: &mut Request) {
    request.reset_parsed();

    if !has_request_line(&request.raw) {
        // Malformed or still-partial data: everything received so far is
        // body content. Handlers see empty method/url/proto.
        request.body = request.raw.clone();
        request.body_length = request.body.len();
        request.opaque_body = true;
        return;
    }

    let mut in_body = false;

    for (i, line) in request.raw.split("\r\n").enumerate() {
        if in_body {
            request.body.push_str(line);
            request.body_length += line.len();
            continue;
        }

        let mut parts = line.splitn(2, ':');
        let name = parts.next().unwrap_or("");
        let value = parts.next();

        if value.is_none() && line.is_empty() {
            // Blank line: header/body boundary.
            in_body = true;
            request.headers_complete = true;
            continue;
        }

        if i == 0 && value.is_none() {
            let mut words = line.split(' ');
            request.method = words.next().unwrap_or("").to_string();
            request.url = words.next().unwrap_or("").trim().to_string();
            request.proto = words.next().unwrap_or("").trim().to_string();
            continue;
        }

        if let Some(v) = value {
            request.headers.insert(name.to_lowercase(), v.trim().to_string());
        }
    }
}

/// Whether the buffer starts with a CRLF-terminated, plausible request line:
/// uppercase method token, absolute path, `HTTP/x.y` version.
fn has_request_line(raw: &str) -> bool {
    let Some(end) = raw.find("\r\n") else {
        return false;
    };
    let line = &raw[..end];
    if !line.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
        return false;
    }
    let mut words = line.split(' ');
    let (Some(method), Some(target), Some(version)) = (words.next(), words.next(), words.next())
    else {
        return false;
    };
    !method.is_empty() && target.starts_with('/') && is_http_version(version)
}

fn is_http_version(token: &str) -> bool {
    let Some(rest) = token.strip_prefix("HTTP/") else {
        return false;
    };
    let digits = rest.as_bytes();
    digits.len() == 3
        && digits[0].is_ascii_digit()
        && digits[1] == b'.'
        && digits[2].is_ascii_digit()
}
