use thiserror::Error;

use crate::http::headers::Headers;
use crate::http::request::{extension_of, parse_content_length, Method, RequestHead};

/// Sequence separating the header block from the body.
pub const HEADER_DELIMITER: &[u8] = b"\r\n\r\n";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("header block is not valid UTF-8")]
    InvalidEncoding,
    #[error("request line is missing")]
    MissingRequestLine,
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),
}

/// Parses a header block (request line plus header lines).
///
/// The block may or may not still carry its trailing CRLFCRLF. Header lines
/// without a `": "` separator are skipped.
pub fn parse_head(block: &[u8]) -> Result<RequestHead, ParseError> {
    let text = std::str::from_utf8(block).map_err(|_| ParseError::InvalidEncoding)?;

    let mut lines = text.split("\r\n");

    let request_line = lines
        .next()
        .filter(|line| !line.is_empty())
        .ok_or(ParseError::MissingRequestLine)?;

    let parts: Vec<&str> = request_line.split(' ').collect();
    let [method, target, version] = parts.as_slice() else {
        return Err(ParseError::MalformedRequestLine(request_line.to_string()));
    };
    if method.is_empty() || target.is_empty() || version.is_empty() {
        return Err(ParseError::MalformedRequestLine(request_line.to_string()));
    }

    let mut headers = Headers::new();
    let mut declared_length = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(": ") {
            let (name, value) = (name.trim(), value.trim());
            // The first Content-Length frames the body, whatever follows.
            if declared_length.is_none() && name.eq_ignore_ascii_case("content-length") {
                declared_length = Some(value);
            }
            headers.insert(name, value);
        }
    }

    Ok(RequestHead {
        method: Method::from_token(method),
        target: target.to_string(),
        extension: extension_of(target),
        version: version.strip_prefix("HTTP/").unwrap_or(version).to_string(),
        headers,
        content_length: parse_content_length(declared_length),
    })
}

/// Offset just past the first CRLFCRLF in `buf`, if present.
pub fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_DELIMITER.len())
        .position(|w| w == HEADER_DELIMITER)
        .map(|pos| pos + HEADER_DELIMITER.len())
}
