//! HTTP transport layer for the Drive API.

use crate::errors::TransportError;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::Stream;
use futures::StreamExt;
use pin_project::pin_project;
use reqwest::{header::HeaderMap, Client, Method, StatusCode};
use serde::Serialize;
use std::pin::Pin;
use std::task::{Context, Poll};
use url::Url;

/// HTTP transport abstraction for testability.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends an HTTP request and buffers the response body.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Sends an HTTP request and returns the response body as a stream.
    async fn send_streaming(
        &self,
        request: HttpRequest,
    ) -> Result<StreamingResponse, TransportError>;
}

/// HTTP request representation.
#[derive(Debug)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request URL.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
    /// Request body.
    pub body: RequestBody,
    /// Request timeout.
    pub timeout: Option<std::time::Duration>,
}

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET method.
    Get,
    /// POST method.
    Post,
    /// PUT method.
    Put,
    /// PATCH method.
    Patch,
    /// DELETE method.
    Delete,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// Request body variants.
pub enum RequestBody {
    /// Empty body.
    Empty,
    /// Fixed-size bytes with a content type.
    Bytes {
        /// Body bytes.
        content: Bytes,
        /// Content-Type header value.
        content_type: String,
    },
    /// Multipart body for uploads.
    Multipart(MultipartBody),
}

impl RequestBody {
    /// Creates a JSON body from a serializable value.
    pub fn json<B: Serialize>(body: &B) -> Result<Self, TransportError> {
        let content =
            serde_json::to_vec(body).map_err(|e| TransportError::Serialization(e.to_string()))?;
        Ok(RequestBody::Bytes {
            content: Bytes::from(content),
            content_type: "application/json".to_string(),
        })
    }
}

impl std::fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestBody::Empty => write!(f, "Empty"),
            RequestBody::Bytes { content, .. } => write!(f, "Bytes({} bytes)", content.len()),
            RequestBody::Multipart(_) => write!(f, "Multipart"),
        }
    }
}

/// `multipart/related` body carrying file metadata and media content.
pub struct MultipartBody {
    metadata: Bytes,
    content: Bytes,
    content_type: String,
    boundary: String,
}

impl MultipartBody {
    /// Creates a multipart body from serializable metadata and media bytes.
    pub fn new<M: Serialize>(
        metadata: &M,
        content: Bytes,
        content_type: impl Into<String>,
    ) -> Result<Self, TransportError> {
        let metadata = serde_json::to_vec(metadata)
            .map_err(|e| TransportError::Serialization(e.to_string()))?;
        Ok(Self {
            metadata: Bytes::from(metadata),
            content,
            content_type: content_type.into(),
            boundary: Self::generate_boundary(),
        })
    }

    fn generate_boundary() -> String {
        let timestamp = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        format!("==============={}", timestamp)
    }

    /// Serializes the framed body.
    pub fn to_bytes(&self) -> Bytes {
        let mut result = Vec::with_capacity(self.metadata.len() + self.content.len() + 256);

        result.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        result.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
        result.extend_from_slice(&self.metadata);
        result.extend_from_slice(b"\r\n");

        result.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        result.extend_from_slice(format!("Content-Type: {}\r\n\r\n", self.content_type).as_bytes());
        result.extend_from_slice(&self.content);
        result.extend_from_slice(format!("\r\n--{}--", self.boundary).as_bytes());

        Bytes::from(result)
    }

    /// Returns the Content-Type header value for the framed body.
    pub fn content_type_header(&self) -> String {
        format!("multipart/related; boundary={}", self.boundary)
    }
}

/// Buffered HTTP response.
pub struct HttpResponse {
    /// Response status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Bytes,
}

/// HTTP response whose body is consumed as a stream.
pub struct StreamingResponse {
    /// Response status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body stream.
    pub stream: ByteStream,
}

/// Byte stream over a response body.
#[pin_project]
pub struct ByteStream {
    #[pin]
    inner: Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>,
}

impl ByteStream {
    /// Creates a new byte stream.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, TransportError>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
        }
    }

    /// Buffers the remaining stream into one contiguous byte buffer.
    pub async fn collect(mut self) -> Result<Bytes, TransportError> {
        let mut buffer = Vec::new();
        while let Some(chunk) = self.inner.next().await {
            buffer.extend_from_slice(&chunk?);
        }
        Ok(Bytes::from(buffer))
    }
}

impl Stream for ByteStream {
    type Item = Result<Bytes, TransportError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        this.inner.poll_next(cx)
    }
}

/// Reqwest-based transport implementation.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport around an already configured client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn build(&self, request: HttpRequest) -> reqwest::RequestBuilder {
        let method: Method = request.method.into();
        let mut req = self.client.request(method, request.url);

        for (key, value) in request.headers.iter() {
            req = req.header(key, value);
        }

        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        match request.body {
            RequestBody::Empty => req,
            RequestBody::Bytes {
                content,
                content_type,
            } => req.header("Content-Type", content_type).body(content),
            RequestBody::Multipart(multipart) => req
                .header("Content-Type", multipart.content_type_header())
                .body(multipart.to_bytes()),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self.build(request).send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    async fn send_streaming(
        &self,
        request: HttpRequest,
    ) -> Result<StreamingResponse, TransportError> {
        let response = self.build(request).send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let stream = response
            .bytes_stream()
            .map(|result| result.map_err(TransportError::from));

        Ok(StreamingResponse {
            status,
            headers,
            stream: ByteStream::new(stream),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_multipart_body_framing() {
        let metadata = json!({"name": "test.txt"});
        let content = Bytes::from("Hello, World!");
        let multipart = MultipartBody::new(&metadata, content, "text/plain").unwrap();

        let boundary = multipart.boundary.clone();
        let body = String::from_utf8(multipart.to_bytes().to_vec()).unwrap();

        assert!(body.starts_with(&format!("--{}\r\n", boundary)));
        assert!(body.contains("Content-Type: application/json; charset=UTF-8\r\n\r\n"));
        assert!(body.contains(r#"{"name":"test.txt"}"#));
        assert!(body.contains("Content-Type: text/plain\r\n\r\nHello, World!"));
        assert!(body.ends_with(&format!("\r\n--{}--", boundary)));

        assert_eq!(
            multipart.content_type_header(),
            format!("multipart/related; boundary={}", boundary)
        );
    }

    #[test]
    fn test_http_method_conversion() {
        assert_eq!(Method::from(HttpMethod::Get), Method::GET);
        assert_eq!(Method::from(HttpMethod::Post), Method::POST);
        assert_eq!(Method::from(HttpMethod::Delete), Method::DELETE);
    }

    #[test]
    fn test_byte_stream_collect() {
        let chunks = vec![
            Ok(Bytes::from("chunk one, ")),
            Ok(Bytes::from("chunk two")),
        ];
        let stream = ByteStream::new(futures::stream::iter(chunks));
        let collected = tokio_test::block_on(stream.collect()).unwrap();
        assert_eq!(collected, Bytes::from("chunk one, chunk two"));
    }

    #[test]
    fn test_byte_stream_collect_propagates_errors() {
        let chunks = vec![
            Ok(Bytes::from("partial")),
            Err(TransportError::Network("reset".to_string())),
        ];
        let stream = ByteStream::new(futures::stream::iter(chunks));
        let result = tokio_test::block_on(stream.collect());
        assert!(matches!(result, Err(TransportError::Network(_))));
    }
}
