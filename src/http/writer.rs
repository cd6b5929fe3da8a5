use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Serializes a response into the exact bytes written to the socket.
///
/// A `Content-Length` header is appended when absent and the body is
/// non-empty. Headers are emitted in insertion order and every line ends
/// in CRLF.
pub fn serialize_response(resp: &Response) -> Bytes {
    let needs_length = !resp.body.is_empty() && resp.header("Content-Length").is_none();
    let mut buf = BytesMut::with_capacity(128 + resp.body.len());

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status,
        resp.reason_phrase()
    );
    buf.put_slice(status_line.as_bytes());

    // Headers
    for (k, v) in &resp.headers {
        put_header(&mut buf, k, v);
    }
    if needs_length {
        put_header(&mut buf, "Content-Length", &resp.body.len().to_string());
    }

    // Header/body separator
    buf.put_slice(b"\r\n");

    // Body
    buf.put_slice(resp.body.as_bytes());

    buf.freeze()
}

fn put_header(buf: &mut BytesMut, name: &str, value: &str) {
    buf.put_slice(name.as_bytes());
    buf.put_slice(b": ");
    buf.put_slice(value.as_bytes());
    buf.put_slice(b"\r\n");
}

/// A fully serialized response waiting to be flushed to a stream.
pub struct ResponseWriter {
    buffer: Bytes,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    pub async fn write_to_stream<S>(&mut self, stream: &mut S) -> anyhow::Result<()>
    where
        S: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_gets_no_content_length() {
        let bytes = serialize_response(&Response::new(204));
        assert_eq!(&bytes[..], b"HTTP/1.1 204 No Content\r\n\r\n");
    }

    #[test]
    fn content_length_counts_utf8_bytes() {
        let resp = Response::new(200).with_body("héllo");
        let text = String::from_utf8(serialize_response(&resp).to_vec()).unwrap();
        assert!(text.contains("Content-Length: 6\r\n"));
    }
}
