//! Pattern-based request router.
//!
//! Routes are tried in registration order and the first match wins; there is
//! no specificity ranking. A pattern such as `/api/{x}` registered before
//! `/api/static` will always take requests for `/api/static`.

use std::future::Future;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};

use crate::http::middleware::{Handler, HandlerResult};
use crate::http::request::Request;
use crate::http::response::Response;

struct Route {
    method: String,
    pattern: String,
    matcher: Regex,
    handler: Handler,
}

#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

/// Compiles a route pattern into an anchored, case-insensitive regex.
///
/// `{name}` segments become named captures matching `[^/]+`. Everything else
/// is matched literally.
pub fn compile_pattern(pattern: &str) -> anyhow::Result<Regex> {
    let normalized = normalize(pattern);
    let placeholder = Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}")?;

    let mut source = String::from("^");
    let mut last = 0;
    for caps in placeholder.captures_iter(&normalized) {
        let Some(whole) = caps.get(0) else { continue };
        source.push_str(&regex::escape(&normalized[last..whole.start()]));
        source.push_str(&format!("(?P<{}>[^/]+)", &caps[1]));
        last = whole.end();
    }
    source.push_str(&regex::escape(&normalized[last..]));
    source.push('$');

    let matcher = RegexBuilder::new(&source)
        .case_insensitive(true)
        .build()?;
    Ok(matcher)
}

fn normalize(pattern: &str) -> String {
    if pattern.starts_with('/') {
        pattern.to_string()
    } else {
        format!("/{}", pattern)
    }
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a route.
    ///
    /// Fails if the pattern cannot be compiled, e.g. when the same
    /// parameter name appears twice.
    pub fn map(&mut self, method: &str, pattern: &str, handler: Handler) -> anyhow::Result<&mut Self> {
        let matcher = compile_pattern(pattern)?;
        tracing::debug!(method, pattern, "Route registered");
        self.routes.push(Route {
            method: method.to_string(),
            pattern: normalize(pattern),
            matcher,
            handler,
        });
        Ok(self)
    }

    /// Registers an async function as a route handler.
    pub fn map_fn<F, Fut>(&mut self, method: &str, pattern: &str, f: F) -> anyhow::Result<&mut Self>
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.map(method, pattern, Handler::from_fn(f))
    }

    pub fn get(&mut self, pattern: &str, handler: Handler) -> anyhow::Result<&mut Self> {
        self.map("GET", pattern, handler)
    }

    pub fn post(&mut self, pattern: &str, handler: Handler) -> anyhow::Result<&mut Self> {
        self.map("POST", pattern, handler)
    }

    /// (method, normalized pattern) pairs in registration order.
    pub fn routes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.routes
            .iter()
            .map(|r| (r.method.as_str(), r.pattern.as_str()))
    }

    /// Dispatches a request to the first matching route.
    ///
    /// Captured parameters are written into `route_params`, overwriting
    /// same-named entries. Unmatched requests get a plain-text 404. Handler
    /// errors are returned as-is.
    pub async fn route(&self, mut req: Request) -> HandlerResult {
        let matched = {
            let path = req.path_without_query();
            self.routes.iter().find_map(|route| {
                if !route.method.eq_ignore_ascii_case(&req.method) {
                    return None;
                }
                let caps = route.matcher.captures(path)?;
                let params: Vec<(String, String)> = route
                    .matcher
                    .capture_names()
                    .flatten()
                    .filter_map(|name| {
                        caps.name(name)
                            .map(|m| (name.to_string(), m.as_str().to_string()))
                    })
                    .collect();
                Some((route, params))
            })
        };

        match matched {
            Some((route, params)) => {
                tracing::trace!(method = %req.method, pattern = %route.pattern, "Route matched");
                req.route_params.extend(params);
                route.handler.call(req).await
            }
            None => {
                tracing::debug!(method = %req.method, path = %req.path, "No route matched");
                Ok(Response::not_found())
            }
        }
    }

    /// Turns the router into the terminal handler of a pipeline.
    pub fn into_handler(self) -> Handler {
        let router = Arc::new(self);
        Handler::from_fn(move |req| {
            let router = Arc::clone(&router);
            async move { router.route(req).await }
        })
    }
}
