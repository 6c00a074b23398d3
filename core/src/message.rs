//! Request and response values.
//!
//! # Design
//! `Request` is immutable: the `with_*` methods consume the value and return
//! a new one with a single field replaced, so options can be layered onto a
//! bare request without exposing setters. The body is the only part that is
//! not `Clone` (it may be a caller-supplied stream), which is why errors carry
//! a `RequestHead` instead of the request itself.
//!
//! `Response` is built by the client only. Its reason phrase is always
//! derived from the status table and is never supplied by the caller.

use std::fmt;

use serde::de::DeserializeOwned;
use ureq::http;

use crate::headers::HeaderMap;
use crate::status;
use crate::stream::{BodyStream, Stream};

/// HTTP method token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    /// Any other token, stored uppercased.
    Other(String),
}

impl Method {
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Other(token) => token,
        }
    }
}

impl From<&str> for Method {
    fn from(token: &str) -> Self {
        let token = token.to_ascii_uppercase();
        match token.as_str() {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "PATCH" => Method::Patch,
            "DELETE" => Method::Delete,
            "HEAD" => Method::Head,
            "OPTIONS" => Method::Options,
            _ => Method::Other(token),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request target, kept as the caller wrote it.
///
/// The accessors parse on demand and return `None` when the text is not an
/// absolute URI. Rejecting bad targets is left to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Uri(String);

impl Uri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn scheme(&self) -> Option<String> {
        self.parsed()?.scheme_str().map(str::to_string)
    }

    pub fn host(&self) -> Option<String> {
        self.parsed()?.host().map(str::to_string)
    }

    pub fn path(&self) -> Option<String> {
        self.parsed().map(|uri| uri.path().to_string())
    }

    pub fn query(&self) -> Option<String> {
        self.parsed()?.query().map(str::to_string)
    }

    fn parsed(&self) -> Option<http::Uri> {
        self.0.parse::<http::Uri>().ok()
    }
}

impl From<&str> for Uri {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

impl From<String> for Uri {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request body: raw bytes or a stream.
#[derive(Debug)]
pub enum Body {
    Bytes(Vec<u8>),
    Stream(Box<dyn Stream>),
}

impl Body {
    pub fn stream(stream: impl Stream + 'static) -> Self {
        Body::Stream(Box::new(stream))
    }

    /// Normalize into a stream, wrapping raw bytes in a fresh `BodyStream`.
    pub fn into_stream(self) -> Box<dyn Stream> {
        match self {
            Body::Bytes(bytes) => Box::new(BodyStream::from_bytes(bytes)),
            Body::Stream(stream) => stream,
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::stream(BodyStream::empty())
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(bytes)
    }
}

impl From<&[u8]> for Body {
    fn from(bytes: &[u8]) -> Self {
        Body::Bytes(bytes.to_vec())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Bytes(text.into_bytes())
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Bytes(text.as_bytes().to_vec())
    }
}

impl From<BodyStream> for Body {
    fn from(stream: BodyStream) -> Self {
        Body::stream(stream)
    }
}

/// Everything of a request except its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
}

#[derive(Debug)]
pub struct Request {
    head: RequestHead,
    body: Body,
}

impl Request {
    /// A bare request: no headers, empty body.
    pub fn new(method: impl Into<Method>, uri: impl Into<Uri>) -> Self {
        Self {
            head: RequestHead {
                method: method.into(),
                uri: uri.into(),
                headers: HeaderMap::new(),
            },
            body: Body::default(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.head.method
    }

    pub fn uri(&self) -> &Uri {
        &self.head.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.head.headers
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn head(&self) -> &RequestHead {
        &self.head
    }

    /// Replace the whole header map.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.head.headers = headers;
        self
    }

    /// Append one header value.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.head.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_method(mut self, method: impl Into<Method>) -> Self {
        self.head.method = method.into();
        self
    }

    pub fn with_uri(mut self, uri: impl Into<Uri>) -> Self {
        self.head.uri = uri.into();
        self
    }

    pub fn into_parts(self) -> (RequestHead, Body) {
        (self.head, self.body)
    }
}

/// A fully buffered response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status_code: u16,
    reason_phrase: String,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status_code: u16, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status_code,
            reason_phrase: status::reason_phrase_or_empty(status_code).to_string(),
            headers,
            body,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Canonical text for the status code, or empty when the code is unknown.
    pub fn reason_phrase(&self) -> &str {
        &self.reason_phrase
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// The body as a fresh seekable stream.
    pub fn body_stream(&self) -> BodyStream {
        BodyStream::from_bytes(self.body.clone())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn is_redirection(&self) -> bool {
        (300..400).contains(&self.status_code)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code)
    }
}
