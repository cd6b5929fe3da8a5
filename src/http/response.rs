/// Returns the reason phrase for a status code.
///
/// Codes outside the table map to an empty phrase, which still yields a
/// well-formed status line such as `HTTP/1.1 418 `.
///
/// # Example
///
/// ```
/// # use waypoint::http::response::reason_phrase;
/// assert_eq!(reason_phrase(200), "OK");
/// assert_eq!(reason_phrase(404), "Not Found");
/// assert_eq!(reason_phrase(418), "");
/// ```
pub fn reason_phrase(code: u16) -> &'static str {
    match code {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        415 => "Unsupported Media Type",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "",
    }
}

/// Represents an HTTP response produced by the pipeline.
///
/// Headers keep their insertion order, which is the order they are written
/// to the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// The numeric HTTP status code
    pub status: u16,
    /// HTTP headers in insertion order
    pub headers: Vec<(String, String)>,
    /// Response body
    pub body: String,
}

impl Response {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    /// Adds a header, replacing the value in place if the name is already present.
    ///
    /// # Example
    ///
    /// ```
    /// # use waypoint::http::response::Response;
    /// let resp = Response::new(200)
    ///     .with_header("Content-Type", "text/plain")
    ///     .with_header("Cache-Control", "no-cache");
    /// assert_eq!(resp.headers[1].0, "Cache-Control");
    /// ```
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(key, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.headers.push((key, value)),
        }
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn reason_phrase(&self) -> &'static str {
        reason_phrase(self.status)
    }

    /// Creates a 200 OK response with a plain-text body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::text(200, body)
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status)
            .with_header("Content-Type", "text/plain")
            .with_body(body)
    }

    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self::new(status)
            .with_header("Content-Type", "application/json")
            .with_body(body)
    }

    /// Creates the router's 404 response.
    pub fn not_found() -> Self {
        Self::text(404, "Not Found")
    }

    pub fn bad_request() -> Self {
        Self::text(400, "Bad Request")
    }

    /// Creates the fixed 500 response sent when request handling fails.
    pub fn internal_error() -> Self {
        Self::text(500, "Internal Server Error")
    }
}
