//! A small HTTP/1.1 client for JSON POSTs to the advisor service.
//!
//! Each request opens a fresh TCP connection, sends the request with
//! `Connection: close`, and reads until the peer hangs up. That keeps the
//! client stateless and is plenty for one request per player action.
//!
//! The response parser understands exactly what the advisor sends back:
//! a status line, headers, and a body framed by `Content-Length`, by
//! `Transfer-Encoding: chunked`, or by connection close.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::TransportError;

/// Default cap on the size of a whole response, headers included.
pub const MAX_RESPONSE_BYTES: usize = 1 << 20;

/// Sends JSON bodies to one `host:port` over HTTP/1.1.
#[derive(Debug, Clone)]
pub struct HttpClient {
    address: String,
    timeout: Duration,
    max_response_bytes: usize,
}

impl HttpClient {
    /// Creates a client for `address` (`host:port`, no scheme).
    ///
    /// `timeout` bounds the whole exchange: connect, write, and read.
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
            max_response_bytes: MAX_RESPONSE_BYTES,
        }
    }

    /// Replaces the response size cap. Larger replies are rejected as
    /// [`TransportError::MalformedResponse`].
    pub fn with_max_response_bytes(mut self, limit: usize) -> Self {
        self.max_response_bytes = limit;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// POSTs `body` to `path` and returns the response body.
    ///
    /// # Errors
    /// - [`TransportError::ConnectFailed`] / `SendFailed` / `ReceiveFailed`
    ///   for socket failures
    /// - [`TransportError::Status`] for any non-2xx status
    /// - [`TransportError::MalformedResponse`] if the reply isn't HTTP or
    ///   is larger than the size cap
    /// - [`TransportError::Timeout`] if the exchange exceeds the timeout
    pub async fn post_json(&self, path: &str, body: &[u8]) -> Result<Vec<u8>, TransportError> {
        match tokio::time::timeout(self.timeout, self.exchange(path, body)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(self.timeout)),
        }
    }

    async fn exchange(&self, path: &str, body: &[u8]) -> Result<Vec<u8>, TransportError> {
        let mut stream = TcpStream::connect(&self.address)
            .await
            .map_err(TransportError::ConnectFailed)?;

        let head = format!(
            "POST {path} HTTP/1.1\r\n\
             Host: {host}\r\n\
             Content-Type: application/json\r\n\
             Accept: application/json\r\n\
             Content-Length: {len}\r\n\
             Connection: close\r\n\
             \r\n",
            host = self.address,
            len = body.len(),
        );
        stream
            .write_all(head.as_bytes())
            .await
            .map_err(TransportError::SendFailed)?;
        stream.write_all(body).await.map_err(TransportError::SendFailed)?;
        stream.flush().await.map_err(TransportError::SendFailed)?;

        // One byte past the cap tells an oversized reply from one that fits exactly.
        let limit = self.max_response_bytes;
        let mut raw = Vec::new();
        (&mut stream)
            .take(limit as u64 + 1)
            .read_to_end(&mut raw)
            .await
            .map_err(TransportError::ReceiveFailed)?;
        if raw.len() > limit {
            return Err(TransportError::MalformedResponse(format!(
                "response exceeds {limit} bytes"
            )));
        }

        let response = parse_response(&raw)?;
        tracing::trace!(
            address = %self.address,
            path,
            status = response.status,
            bytes = response.body.len(),
            "HTTP response received"
        );

        if !(200..300).contains(&response.status) {
            return Err(TransportError::Status(response.status));
        }
        Ok(response.body)
    }
}

#[derive(Debug, PartialEq, Eq)]
struct HttpResponse {
    status: u16,
    body: Vec<u8>,
}

fn malformed(reason: &str) -> TransportError {
    TransportError::MalformedResponse(reason.to_string())
}

fn parse_response(raw: &[u8]) -> Result<HttpResponse, TransportError> {
    let head_end = find(raw, b"\r\n\r\n").ok_or_else(|| malformed("missing end of headers"))?;
    let head = std::str::from_utf8(&raw[..head_end]).map_err(|_| malformed("headers are not UTF-8"))?;

    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap_or_default();
    let mut parts = status_line.splitn(3, ' ');
    if !parts.next().unwrap_or_default().starts_with("HTTP/1.") {
        return Err(malformed("not an HTTP/1.x status line"));
    }
    let status: u16 = parts
        .next()
        .and_then(|code| code.parse().ok())
        .ok_or_else(|| malformed("missing status code"))?;

    let mut content_length = None;
    let mut chunked = false;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let (name, value) = (name.trim(), value.trim());
        if name.eq_ignore_ascii_case("content-length") {
            content_length = Some(
                value
                    .parse::<usize>()
                    .map_err(|_| malformed("bad Content-Length"))?,
            );
        } else if name.eq_ignore_ascii_case("transfer-encoding")
            && value.to_ascii_lowercase().contains("chunked")
        {
            chunked = true;
        }
    }

    let rest = &raw[head_end + 4..];
    let body = if chunked {
        decode_chunked(rest)?
    } else if let Some(len) = content_length {
        if rest.len() < len {
            return Err(malformed("body shorter than Content-Length"));
        }
        rest[..len].to_vec()
    } else {
        rest.to_vec()
    };

    Ok(HttpResponse { status, body })
}

fn decode_chunked(mut data: &[u8]) -> Result<Vec<u8>, TransportError> {
    let mut body = Vec::new();
    loop {
        let line_end = find(data, b"\r\n").ok_or_else(|| malformed("truncated chunk size"))?;
        let size_line =
            std::str::from_utf8(&data[..line_end]).map_err(|_| malformed("chunk size is not UTF-8"))?;
        // Chunk extensions (";name=value") are allowed and ignored.
        let size_hex = size_line.split(';').next().unwrap_or_default().trim();
        let size =
            usize::from_str_radix(size_hex, 16).map_err(|_| malformed("bad chunk size"))?;
        data = &data[line_end + 2..];

        if size == 0 {
            return Ok(body);
        }
        if size > data.len().saturating_sub(2) {
            return Err(malformed("truncated chunk"));
        }
        body.extend_from_slice(&data[..size]);
        data = &data[size + 2..];
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
