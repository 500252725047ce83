//! HTTP request parsing and handling.

use super::error::{HttpError, HttpResult};
use bytes::Bytes;
use http::{Method, Uri, Version};
use std::collections::HashMap;
use std::str::FromStr;

/// Maximum number of headers to parse.
const MAX_HEADERS: usize = 100;

/// Parsed HTTP request.
///
/// Header names are normalized to lowercase so named lookups are
/// case-insensitive.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method.
    method: Method,
    /// Request URI.
    uri: Uri,
    /// HTTP version.
    version: Version,
    /// Request headers, lowercased names.
    headers: HashMap<String, String>,
    /// Request body.
    body: Bytes,
    /// Peer address the request arrived from, if known.
    remote_addr: Option<String>,
}

impl Request {
    /// Create a new request builder.
    #[must_use]
    pub fn builder() -> RequestBuilder {
        RequestBuilder::new()
    }

    /// Get the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Get the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Get the HTTP version.
    #[must_use]
    pub fn version(&self) -> Version {
        self.version
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

    /// Get the Content-Length header as usize.
    #[must_use]
    pub fn content_length(&self) -> Option<usize> {
        self.header("content-length").and_then(|s| s.parse().ok())
    }

    /// Get the request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Get the peer address.
    #[must_use]
    pub fn remote_addr(&self) -> Option<&str> {
        self.remote_addr.as_deref()
    }

    /// Set the peer address.
    pub fn set_remote_addr(&mut self, addr: impl Into<String>) {
        self.remote_addr = Some(addr.into());
    }

    /// Set a header value.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers
            .insert(name.into().to_lowercase(), value.into());
    }

    /// Remove a header.
    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        self.headers.remove(&name.to_lowercase())
    }

    /// Check if the connection should be kept alive after this request.
    #[must_use]
    pub fn is_keep_alive(&self) -> bool {
        match self.version {
            Version::HTTP_11 => self
                .header("connection")
                .map(|v| !v.eq_ignore_ascii_case("close"))
                .unwrap_or(true),
            Version::HTTP_10 => self
                .header("connection")
                .map(|v| v.eq_ignore_ascii_case("keep-alive"))
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Parse a request head from bytes.
    ///
    /// Returns the request and the byte offset where the body starts.
    /// Incomplete input yields [`HttpError::PartialRequest`] so callers can
    /// keep reading; any other error means the bytes are malformed.
    pub fn parse(data: &[u8]) -> HttpResult<(Self, usize)> {
        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
        let mut req = httparse::Request::new(&mut headers);

        match req.parse(data)? {
            httparse::Status::Complete(body_offset) => {
                let method = Method::from_str(req.method.unwrap_or("GET"))
                    .map_err(|e| HttpError::InvalidMethod(e.to_string()))?;

                let uri = Uri::from_str(req.path.unwrap_or("/"))
                    .map_err(|e| HttpError::InvalidUri(e.to_string()))?;

                let version = match req.version {
                    Some(0) => Version::HTTP_10,
                    _ => Version::HTTP_11,
                };

                let mut headers_map = HashMap::new();
                for header in req.headers.iter() {
                    let name = header.name.to_lowercase();
                    let value = String::from_utf8_lossy(header.value).to_string();
                    headers_map.insert(name, value);
                }

                let request = Request {
                    method,
                    uri,
                    version,
                    headers: headers_map,
                    body: Bytes::new(),
                    remote_addr: None,
                };

                Ok((request, body_offset))
            },
            httparse::Status::Partial => Err(HttpError::PartialRequest),
        }
    }
}

/// Builder for HTTP requests.
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    uri: Option<Uri>,
    version: Option<Version>,
    headers: HashMap<String, String>,
    body: Bytes,
    remote_addr: Option<String>,
}

impl RequestBuilder {
    /// Create a new request builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Set the request URI.
    pub fn uri(mut self, uri: impl Into<String>) -> HttpResult<Self> {
        self.uri =
            Some(Uri::from_str(&uri.into()).map_err(|e| HttpError::InvalidUri(e.to_string()))?);
        Ok(self)
    }

    /// Set the HTTP version.
    #[must_use]
    pub fn version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_lowercase(), value.into());
        self
    }

    /// Set the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Set the peer address.
    #[must_use]
    pub fn remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }

    /// Build the request.
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            method: self.method.unwrap_or(Method::GET),
            uri: self.uri.unwrap_or_else(|| Uri::from_static("/")),
            version: self.version.unwrap_or(Version::HTTP_11),
            headers: self.headers,
            body: self.body,
            remote_addr: self.remote_addr,
        }
    }
}
