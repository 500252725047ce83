//! HTTP response building and serialization.

use bytes::{Bytes, BytesMut};
use http::{StatusCode, Version};
use std::collections::HashMap;

/// HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code.
    status: StatusCode,
    /// HTTP version.
    version: Version,
    /// Response headers, lowercased names.
    headers: HashMap<String, String>,
    /// Response body.
    body: Bytes,
}

impl Response {
    /// Create a new response builder.
    #[must_use]
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::new()
    }

    /// Create an OK (200) response.
    #[must_use]
    pub fn ok() -> ResponseBuilder {
        ResponseBuilder::new().status(StatusCode::OK)
    }

    /// Create a Bad Request (400) response.
    #[must_use]
    pub fn bad_request() -> ResponseBuilder {
        ResponseBuilder::new().status(StatusCode::BAD_REQUEST)
    }

    /// Create an Internal Server Error (500) response.
    #[must_use]
    pub fn internal_error() -> ResponseBuilder {
        ResponseBuilder::new().status(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    /// Get all headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Get the response body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Set a header value.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers
            .insert(name.into().to_lowercase(), value.into());
    }

    /// Serialize the response to wire bytes.
    ///
    /// A Content-Length header is added when the body is non-empty and none
    /// was set explicitly; the body is written exactly once.
    #[must_use]
    pub fn serialize(&self) -> BytesMut {
        let mut buf = BytesMut::new();

        let version_str = match self.version {
            Version::HTTP_10 => "HTTP/1.0",
            _ => "HTTP/1.1",
        };
        buf.extend_from_slice(
            format!(
                "{} {} {}\r\n",
                version_str,
                self.status.as_u16(),
                self.status.canonical_reason().unwrap_or("")
            )
            .as_bytes(),
        );

        for (name, value) in &self.headers {
            buf.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
        }

        if !self.body.is_empty() && !self.headers.contains_key("content-length") {
            buf.extend_from_slice(format!("content-length: {}\r\n", self.body.len()).as_bytes());
        }

        buf.extend_from_slice(b"\r\n");

        if !self.body.is_empty() {
            buf.extend_from_slice(&self.body);
        }

        buf
    }
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            version: Version::HTTP_11,
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }
}

/// Builder for HTTP responses.
#[derive(Debug)]
pub struct ResponseBuilder {
    status: StatusCode,
    version: Version,
    headers: HashMap<String, String>,
    body: Bytes,
}

impl ResponseBuilder {
    /// Create a new response builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            version: Version::HTTP_11,
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Set the status code.
    #[must_use]
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_lowercase(), value.into());
        self
    }

    /// Set the response body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Set a text body with Content-Type: text/plain.
    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.header("content-type", "text/plain; charset=utf-8")
            .body(Bytes::from(text))
    }

    /// Build the response.
    #[must_use]
    pub fn build(self) -> Response {
        Response {
            status: self.status,
            version: self.version,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let resp = Response::builder()
            .status(StatusCode::FORBIDDEN)
            .header("X-Reason", "blocked")
            .text("Access Denied")
            .build();

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(resp.header("x-reason"), Some("blocked"));
        assert_eq!(resp.header("content-type"), Some("text/plain; charset=utf-8"));
        assert_eq!(resp.body().as_ref(), b"Access Denied");
    }

    #[test]
    fn test_serialize() {
        let resp = Response::ok().text("hello").build();
        let s = String::from_utf8_lossy(&resp.serialize()).to_string();

        assert!(s.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(s.contains("content-type: text/plain; charset=utf-8\r\n"));
        assert!(s.contains("content-length: 5\r\n"));
        assert!(s.ends_with("\r\n\r\nhello"));
    }

    #[test]
    fn test_serialize_explicit_content_length() {
        let resp = Response::builder()
            .status(StatusCode::FORBIDDEN)
            .header("content-length", "13")
            .body(Bytes::from_static(b"Access Denied"))
            .build();

        let s = String::from_utf8_lossy(&resp.serialize()).to_string();
        // The explicit header wins; no duplicate is emitted.
        assert_eq!(s.matches("content-length").count(), 1);
        assert!(s.contains("content-length: 13\r\n"));
    }

    #[test]
    fn test_serialize_empty_body() {
        let resp = Response::ok().build();
        let s = String::from_utf8_lossy(&resp.serialize()).to_string();
        assert!(s.ends_with("\r\n\r\n"));
        assert!(!s.contains("content-length"));
    }
}
