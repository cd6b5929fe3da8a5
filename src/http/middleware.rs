//! Handlers and the middleware pipeline.
//!
//! A [`Handler`] turns a [`Request`] into an eventual [`Response`]. Middleware
//! are factories that take the next handler and return a wrapping one; the
//! [`MiddlewareBuilder`] composes them around a terminal handler, usually the
//! router.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use futures_util::future::BoxFuture;

use crate::http::request::Request;
use crate::http::response::Response;

pub type HandlerResult = anyhow::Result<Response>;

type HandlerFn = dyn Fn(Request) -> BoxFuture<'static, HandlerResult> + Send + Sync;

/// A cloneable, shareable request handler.
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    /// Wraps an async function or closure.
    ///
    /// # Example
    ///
    /// ```
    /// # use waypoint::http::middleware::Handler;
    /// # use waypoint::http::response::Response;
    /// let hello = Handler::from_fn(|_req| async { Ok(Response::ok("hello")) });
    /// ```
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self(Arc::new(move |req| -> BoxFuture<'static, HandlerResult> {
            Box::pin(f(req))
        }))
    }

    pub fn call(&self, req: Request) -> BoxFuture<'static, HandlerResult> {
        (self.0)(req)
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Handler(..)")
    }
}

type Factory = dyn Fn(Handler) -> Handler + Send + Sync;

/// Ordered list of middleware factories.
#[derive(Clone, Default)]
pub struct MiddlewareBuilder {
    factories: Vec<Arc<Factory>>,
}

impl MiddlewareBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a middleware factory. Requests pass through middleware in the
    /// order they were added.
    pub fn use_middleware<F>(&mut self, factory: F) -> &mut Self
    where
        F: Fn(Handler) -> Handler + Send + Sync + 'static,
    {
        self.factories.push(Arc::new(factory));
        self
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Composes the registered middleware around `terminal`.
    ///
    /// The last factory wraps `terminal` first, so the first one registered
    /// ends up outermost. The builder itself is left untouched and may be
    /// built again.
    pub fn build(&self, terminal: Handler) -> Handler {
        self.factories
            .iter()
            .rev()
            .fold(terminal, |next, factory| factory(next))
    }
}

/// Middleware that logs every request and the status it produced.
///
/// Errors are logged and passed on unchanged.
pub fn logging() -> impl Fn(Handler) -> Handler + Send + Sync + 'static {
    |next: Handler| {
        Handler::from_fn(move |req: Request| {
            let next = next.clone();
            async move {
                let method = req.method.clone();
                let path = req.path.clone();
                let started = Instant::now();

                tracing::debug!(%method, %path, "Request started");
                let result = next.call(req).await;
                let elapsed_ms = started.elapsed().as_millis() as u64;

                match &result {
                    Ok(resp) => tracing::info!(
                        %method,
                        %path,
                        status = resp.status,
                        elapsed_ms,
                        "Request completed"
                    ),
                    Err(e) => tracing::warn!(
                        %method,
                        %path,
                        error = %e,
                        elapsed_ms,
                        "Request failed"
                    ),
                }

                result
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_builder_returns_terminal() {
        let terminal = Handler::from_fn(|_req| async { Ok(Response::ok("done")) });
        let pipeline = MiddlewareBuilder::new().build(terminal);

        let resp = pipeline.call(Request::new("GET", "/")).await.unwrap();
        assert_eq!(resp.body, "done");
    }

    #[tokio::test]
    async fn logging_passes_response_through() {
        let mut builder = MiddlewareBuilder::new();
        builder.use_middleware(logging());
        let pipeline = builder.build(Handler::from_fn(|_req| async {
            Ok(Response::new(201))
        }));

        let resp = pipeline.call(Request::new("POST", "/items")).await.unwrap();
        assert_eq!(resp.status, 201);
    }
}
