use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing_subscriber::EnvFilter;

use waypoint::config::Config;
use waypoint::http::connection::ContextProvider;
use waypoint::http::middleware::{logging, Handler, MiddlewareBuilder};
use waypoint::http::request::{Request, RequestContext};
use waypoint::http::response::Response;
use waypoint::http::router::Router;
use waypoint::server::Listener;

/// Per-request scope handed to handlers.
struct RequestScope {
    sequence: u64,
}

fn routes() -> anyhow::Result<Router> {
    let mut router = Router::new();

    router
        .map_fn("GET", "/health", |_req| async { Ok(Response::ok("ok")) })?
        .map_fn("GET", "/customers/{id}", |req: Request| async move {
            let id = req.route_param("id").unwrap_or_default();
            Ok(Response::json(200, format!(r#"{{"id":"{}"}}"#, id)))
        })?
        .post(
            "/echo",
            Handler::from_fn(|req: Request| async move {
                let content_type = req.header("Content-Type").unwrap_or("text/plain").to_string();
                Ok(Response::new(200)
                    .with_header("Content-Type", content_type)
                    .with_body(req.body))
            }),
        )?
        .map_fn("GET", "/search", |req: Request| async move {
            let q = req.query_param("q").unwrap_or_default();
            let seq = req.context_as::<RequestScope>().map(|s| s.sequence).unwrap_or(0);
            Ok(Response::ok(format!("request {} searched for '{}'", seq, q)))
        })?;

    Ok(router)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    let mut middleware = MiddlewareBuilder::new();
    middleware.use_middleware(logging());
    let pipeline: Handler = middleware.build(routes()?.into_handler());

    let counter = Arc::new(AtomicU64::new(0));
    let contexts: ContextProvider = Arc::new(move || {
        RequestContext::new(RequestScope {
            sequence: counter.fetch_add(1, Ordering::Relaxed) + 1,
        })
    });

    let listener = Listener::bind(&cfg.listen_addr, pipeline)
        .await?
        .with_context(contexts)
        .with_shutdown_timeout(cfg.shutdown_timeout);

    listener
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await
}
