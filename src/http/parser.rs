use crate::http::request::Request;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Empty request")]
    Empty,
    #[error("Invalid request line: '{0}'")]
    InvalidRequestLine(String),
    #[error("Invalid request line: '{0}' (empty method)")]
    EmptyMethod(String),
}

/// Parses the request line and header block of a request.
///
/// `text` is everything up to (and optionally including) the blank line
/// that ends the headers. The returned request always has an empty body;
/// reading `Content-Length` bytes is the connection's job.
///
/// Header lines without a `": "` separator are skipped. A repeated header
/// name keeps the last value.
pub fn parse_request_head(text: &str) -> Result<Request, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut lines = text.split("\r\n");

    // Request line
    let request_line = lines.next().unwrap_or_default();
    let parts: Vec<&str> = request_line.split(' ').collect();
    if parts.len() < 2 {
        return Err(ParseError::InvalidRequestLine(request_line.to_string()));
    }

    let method = parts[0].trim();
    if method.is_empty() {
        return Err(ParseError::EmptyMethod(request_line.to_string()));
    }

    let mut request = Request::new(method, parts[1]);
    if let Some(version) = parts.get(2).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        request.version = version.to_string();
    }

    // Headers
    for line in lines {
        if line.is_empty() {
            break;
        }

        if let Some((key, value)) = line.split_once(": ") {
            request.headers.insert(key.to_string(), value.to_string());
        }
    }

    Ok(request)
}
