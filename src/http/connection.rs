use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::http::middleware::Handler;
use crate::http::parser::{parse_request_head, ParseError};
use crate::http::request::{Request, RequestContext};
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// Produces the opaque context attached to each request before processing.
pub type ContextProvider = Arc<dyn Fn() -> RequestContext + Send + Sync>;

/// Drives a single request/response exchange over one stream.
pub struct Connection<S> {
    stream: BufReader<S>,
    pipeline: Handler,
    contexts: Option<ContextProvider>,
    state: ConnectionState,
}

pub enum ConnectionState {
    ReadingHeaders,
    ReadingBody(Request),
    Processing(Request),
    Responding(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, pipeline: Handler) -> Self {
        Self {
            stream: BufReader::new(stream),
            pipeline,
            contexts: None,
            state: ConnectionState::ReadingHeaders,
        }
    }

    pub fn with_context(mut self, contexts: Option<ContextProvider>) -> Self {
        self.contexts = contexts;
        self
    }

    /// Runs the connection to completion.
    ///
    /// Failures while reading or processing are answered with an error
    /// response instead of being returned. Only a failed final write is
    /// reported to the caller. The stream is shut down in every case.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut outcome = Ok(());

        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::ReadingHeaders => match self.read_headers().await {
                    Ok(req) => ConnectionState::ReadingBody(req),
                    Err(e) => Self::fail(e),
                },

                ConnectionState::ReadingBody(mut req) => match self.read_body(&mut req).await {
                    Ok(()) => ConnectionState::Processing(req),
                    Err(e) => Self::fail(e),
                },

                ConnectionState::Processing(req) => match self.process(req).await {
                    Ok(response) => ConnectionState::Responding(ResponseWriter::new(&response)),
                    Err(e) => Self::fail(e),
                },

                ConnectionState::Responding(mut writer) => {
                    if let Err(e) = writer.write_to_stream(self.stream.get_mut()).await {
                        outcome = Err(e);
                    }
                    ConnectionState::Closed
                }

                ConnectionState::Closed => {
                    let _ = self.stream.get_mut().shutdown().await;
                    break;
                }
            };
        }

        outcome
    }

    /// Reads lines up to and including the blank line ending the headers.
    ///
    /// End of stream also ends the header block; whatever arrived so far is
    /// handed to the parser.
    async fn read_headers(&mut self) -> anyhow::Result<Request> {
        let mut head = String::new();

        loop {
            let mut line = String::new();
            let n = self.stream.read_line(&mut line).await?;
            if n == 0 {
                break;
            }

            let blank = line == "\r\n" || line == "\n";
            head.push_str(&line);
            if blank {
                break;
            }
        }

        Ok(parse_request_head(&head)?)
    }

    async fn read_body(&mut self, req: &mut Request) -> anyhow::Result<()> {
        let Some(len) = req.content_length() else {
            return Ok(());
        };
        if len == 0 {
            return Ok(());
        }

        // Grow with the data actually received; the header value is untrusted.
        let mut body = Vec::new();
        (&mut self.stream).take(len as u64).read_to_end(&mut body).await?;
        if body.len() < len {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("body ended after {} of {} bytes", body.len(), len),
            )
            .into());
        }
        req.body = String::from_utf8_lossy(&body).into_owned();
        Ok(())
    }

    async fn process(&mut self, mut req: Request) -> anyhow::Result<Response> {
        if let Some(contexts) = &self.contexts {
            req.set_context(contexts());
        }

        // The call itself runs inside the guarded future so that panics in
        // a middleware's synchronous part are caught too.
        let pipeline = self.pipeline.clone();
        match AssertUnwindSafe(async move { pipeline.call(req).await })
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!("request handler panicked")),
        }
    }

    fn fail(error: anyhow::Error) -> ConnectionState {
        let response = match error.downcast_ref::<ParseError>() {
            Some(parse_error) => {
                tracing::warn!(error = %parse_error, "Rejecting malformed request");
                Response::bad_request()
            }
            None => {
                tracing::error!(error = %error, "Request handling failed");
                Response::internal_error()
            }
        };

        ConnectionState::Responding(ResponseWriter::new(&response))
    }
}
