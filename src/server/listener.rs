use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::info;

use crate::http::connection::{Connection, ContextProvider};
use crate::http::middleware::Handler;

const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// Accepts connections and hands each one to its own task.
pub struct Listener {
    listener: TcpListener,
    pipeline: Handler,
    contexts: Option<ContextProvider>,
    shutdown_timeout: Option<Duration>,
}

impl Listener {
    pub async fn bind(addr: &str, pipeline: Handler) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!("Listening on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            pipeline,
            contexts: None,
            shutdown_timeout: None,
        })
    }

    pub fn with_context(mut self, contexts: ContextProvider) -> Self {
        self.contexts = Some(contexts);
        self
    }

    /// Bounds how long shutdown waits for in-flight connections.
    pub fn with_shutdown_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until `shutdown` completes, then waits for the
    /// connections already dispatched.
    ///
    /// When a shutdown timeout is set and elapses, remaining connections are
    /// left to finish on their own and the port is released.
    pub async fn run<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut tasks = JoinSet::new();

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!(in_flight = tasks.len(), "Shutdown requested, no longer accepting");
                    break;
                }

                accepted = self.listener.accept() => {
                    let (socket, peer) = match accepted {
                        Ok(pair) => pair,
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to accept connection");
                            // Errors like EMFILE persist; don't spin on them.
                            tokio::time::sleep(ACCEPT_BACKOFF).await;
                            continue;
                        }
                    };
                    tracing::debug!("Accepted connection from {}", peer);

                    let pipeline = self.pipeline.clone();
                    let contexts = self.contexts.clone();
                    tasks.spawn(async move {
                        let mut conn = Connection::new(socket, pipeline).with_context(contexts);
                        if let Err(e) = conn.run().await {
                            tracing::error!("Connection error from {}: {}", peer, e);
                        }
                    });
                }

                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = joined {
                        tracing::error!(error = %e, "Connection task failed");
                    }
                }
            }
        }

        drain(&mut tasks, self.shutdown_timeout).await;
        info!("Listener stopped");
        Ok(())
    }
}

async fn drain(tasks: &mut JoinSet<()>, limit: Option<Duration>) {
    let wait_all = async {
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "Connection task failed");
            }
        }
    };

    match limit {
        None => wait_all.await,
        Some(limit) => {
            if tokio::time::timeout(limit, wait_all).await.is_err() {
                tracing::warn!(
                    abandoned = tasks.len(),
                    "Shutdown grace period elapsed, abandoning connections"
                );
                // Dropping a JoinSet aborts its tasks; detach them instead.
                tasks.detach_all();
            }
        }
    }
}
