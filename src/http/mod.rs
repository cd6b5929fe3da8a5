//! HTTP protocol implementation.
//!
//! One request per connection, HTTP/1.1 framing with `Content-Length` bodies.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection state machine
//! - **`parser`**: Parses the request line and headers into a `Request`
//! - **`request`**: HTTP request representation, query decoding, context slot
//! - **`response`**: HTTP response representation and reason phrases
//! - **`writer`**: Serializes and writes responses to the client
//! - **`router`**: Pattern-based dispatch with route parameters
//! - **`middleware`**: Handlers and the middleware pipeline builder
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │  ReadingHeaders  │ ← Read lines until the blank line, then parse
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │   ReadingBody    │ ← Read exactly Content-Length bytes, if any
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │    Processing    │ ← Attach context, run middleware → router
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │    Responding    │ ← Serialize and write the response
//!        └──────┬───────────┘
//!               ▼
//!             Closed
//! ```
//!
//! A failure in any stage before `Responding` replaces the response with a
//! fixed error response: 400 for malformed requests, 500 for everything else.
//!
//! # Example
//!
//! ```no_run
//! use waypoint::http::middleware::{logging, MiddlewareBuilder};
//! use waypoint::http::response::Response;
//! use waypoint::http::router::Router;
//! use waypoint::server::Listener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut router = Router::new();
//!     router.map_fn("GET", "/hello/{name}", |req| async move {
//!         let name = req.route_param("name").unwrap_or("world").to_string();
//!         Ok(Response::ok(format!("Hello, {}!", name)))
//!     })?;
//!
//!     let mut middleware = MiddlewareBuilder::new();
//!     middleware.use_middleware(logging());
//!
//!     let pipeline = middleware.build(router.into_handler());
//!     Listener::bind("127.0.0.1:8080", pipeline)
//!         .await?
//!         .run(async { let _ = tokio::signal::ctrl_c().await; })
//!         .await
//! }
//! ```

pub mod connection;
pub mod middleware;
pub mod parser;
pub mod request;
pub mod response;
pub mod router;
pub mod writer;
