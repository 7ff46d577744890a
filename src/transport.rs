//! HTTP transport seam.
//!
//! The client never talks to `reqwest` directly: it builds an
//! [`HttpRequest`] and hands it to a [`Transport`]. The default
//! [`ReqwestTransport`] covers production use; tests inject their own
//! implementation to record requests and script responses without a
//! network.
//!
//! Response bodies are exposed as a [`ByteStream`] so a large rendered
//! image can be forwarded to disk chunk by chunk.

use crate::config::ClientConfig;
use crate::error::{BoxError, Pdf2ImgError};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::stream::{self, Stream, TryStreamExt};
use std::pin::Pin;
use tracing::debug;

pub use reqwest::Method;

/// A response body delivered as a stream of chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, BoxError>> + Send>>;

/// Outbound request handed to a [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// A body-less `GET`.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// A `POST` carrying `body`.
    pub fn post(url: impl Into<String>, body: Bytes) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First header value matching `name`, case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response returned by a [`Transport`].
pub struct HttpResponse {
    pub status: u16,
    pub body: ByteStream,
}

impl HttpResponse {
    /// A response whose whole body is already in memory.
    pub fn from_bytes(status: u16, body: impl Into<Bytes>) -> Self {
        let body: Bytes = body.into();
        Self {
            status,
            body: Box::pin(stream::once(async move { Ok::<_, BoxError>(body) })),
        }
    }

    /// Drain the body into one buffer.
    pub async fn bytes(self) -> Result<Bytes, BoxError> {
        let mut buf = BytesMut::new();
        let mut body = self.body;
        while let Some(chunk) = body.try_next().await? {
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.freeze())
    }
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("body", &"<stream>")
            .finish()
    }
}

/// Sends one HTTP request and returns the response or a transport error.
///
/// Implementations must not treat non-2xx statuses as errors; status
/// handling is the client's job.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError>;
}

/// Default transport backed by a pooled [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport honouring the timeout and user agent of `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, Pdf2ImgError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Pdf2ImgError::InvalidConfig(format!("HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        debug!("{} {}", request.method, request.url);

        let mut builder = self.client.request(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        debug!("{} answered {}", request.url, status);

        let body = response
            .bytes_stream()
            .map_err(|e| Box::new(e) as BoxError);
        Ok(HttpResponse {
            status,
            body: Box::pin(body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = HttpRequest::get("http://h/health").header("Content-Type", "text/plain");
        assert_eq!(req.header_value("content-type"), Some("text/plain"));
        assert_eq!(req.header_value("accept"), None);
    }

    #[tokio::test]
    async fn from_bytes_round_trips_body() {
        let resp = HttpResponse::from_bytes(200, &b"hello"[..]);
        assert_eq!(resp.status, 200);
        assert_eq!(resp.bytes().await.unwrap(), Bytes::from_static(b"hello"));
    }

    #[tokio::test]
    async fn bytes_concatenates_chunks() {
        let chunks: Vec<Result<Bytes, BoxError>> = vec![
            Ok(Bytes::from_static(b"ab")),
            Ok(Bytes::from_static(b"cd")),
        ];
        let resp = HttpResponse {
            status: 200,
            body: Box::pin(stream::iter(chunks)),
        };
        assert_eq!(&resp.bytes().await.unwrap()[..], b"abcd");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let config = ClientConfig::builder("http://127.0.0.1:9")
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .unwrap();
        let transport = ReqwestTransport::new(&config).unwrap();
        let result = transport.send(HttpRequest::get("http://127.0.0.1:9/health")).await;
        assert!(result.is_err());
    }
}
