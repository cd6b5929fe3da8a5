use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Opaque per-request context supplied by the embedding application.
///
/// The engine attaches it to every request and carries it through the
/// pipeline without ever looking inside.
#[derive(Clone)]
pub struct RequestContext(Arc<dyn Any + Send + Sync>);

impl RequestContext {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RequestContext(..)")
    }
}

/// Represents a parsed HTTP request from a client.
///
/// Every field is public and may be rewritten by middleware while the
/// request travels through the pipeline.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method as received (e.g. "GET")
    pub method: String,
    /// The request target including any query string (e.g. "/search?q=rust")
    pub path: String,
    /// HTTP version token (typically "HTTP/1.1")
    pub version: String,
    /// Request headers, keys exactly as received
    pub headers: HashMap<String, String>,
    /// Request body, filled by the connection from `Content-Length` bytes
    pub body: String,
    /// Parameters captured by the router on a successful match
    pub route_params: HashMap<String, String>,
    context: Option<RequestContext>,
    query: OnceLock<HashMap<String, String>>,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<String>,
    path: Option<String>,
    version: Option<String>,
    headers: HashMap<String, String>,
    body: String,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            path: None,
            version: None,
            headers: HashMap::new(),
            body: String::new(),
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        let mut request = Request::new(
            self.method.ok_or("method missing")?,
            self.path.ok_or("path missing")?,
        );
        if let Some(version) = self.version {
            request.version = version;
        }
        request.headers = self.headers;
        request.body = self.body;
        Ok(request)
    }
}

impl Request {
    /// Creates a request with no headers, an empty body and no route parameters.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            version: "HTTP/1.1".to_string(),
            headers: HashMap::new(),
            body: String::new(),
            route_params: HashMap::new(),
            context: None,
            query: OnceLock::new(),
        }
    }

    /// Retrieves a header value by its exact name.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }

    /// Parsed `Content-Length` header.
    ///
    /// Returns `None` if the header is missing or not a valid number.
    pub fn content_length(&self) -> Option<usize> {
        self.header("Content-Length")
            .and_then(|v| v.trim().parse().ok())
    }

    /// The path with any `?query` suffix removed.
    pub fn path_without_query(&self) -> &str {
        match self.path.split_once('?') {
            Some((path, _)) => path,
            None => &self.path,
        }
    }

    /// Percent-decoded query parameters.
    ///
    /// Decoded on first access and cached for the lifetime of this request.
    /// Decoding follows `application/x-www-form-urlencoded`, so `+` also
    /// becomes a space. A key without `=` maps to an empty string; on
    /// repeated keys the last occurrence wins. The cache is not invalidated
    /// if `path` is rewritten afterwards.
    pub fn query_params(&self) -> &HashMap<String, String> {
        self.query.get_or_init(|| {
            let query = self.path.split_once('?').map(|(_, q)| q).unwrap_or("");
            url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect()
        })
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query_params().get(key).map(|v| v.as_str())
    }

    pub fn route_param(&self, key: &str) -> Option<&str> {
        self.route_params.get(key).map(|v| v.as_str())
    }

    pub fn set_context(&mut self, context: RequestContext) {
        self.context = Some(context);
    }

    pub fn context(&self) -> Option<&RequestContext> {
        self.context.as_ref()
    }

    /// Typed view of the attached context, if one is present and has type `T`.
    pub fn context_as<T: Any>(&self) -> Option<&T> {
        self.context.as_ref().and_then(|c| c.downcast_ref::<T>())
    }
}
