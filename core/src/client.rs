//! Blocking HTTP client.
//!
//! # Design
//! `Client` owns exactly one `Transport`, and with it one engine handle, for
//! its whole lifetime. Each call overwrites the transport's method, URI,
//! headers and body, so every operation takes `&mut self` and the compiler
//! rules out two in-flight requests on one client. Callers that share a
//! client across threads wrap it in a `Mutex`. Otherwise they keep one client
//! per thread.
//!
//! A call runs in one pass: normalize the body into a seekable stream,
//! detach it, dispatch through the transport, split the combined buffer at
//! the reported header size, parse the header block and build the
//! `Response`. No retries are attempted. Any status code, including 4xx and
//! 5xx, is returned as a normal response.

use crate::codec;
use crate::config::ClientConfig;
use crate::engine::UreqEngine;
use crate::error::{EngineError, Error, FailureKind, EXCHANGE_FAILED};
use crate::headers::HeaderMap;
use crate::message::{Body, Method, Request, RequestHead, Response, Uri};
use crate::stream::{BodyStream, Stream};
use crate::transport::{Engine, Transport};

/// Optional headers and body layered onto a bare request.
#[derive(Debug, Default)]
pub struct RequestOptions {
    /// Applied verbatim. Defaults to an empty header set.
    pub headers: Option<HeaderMap>,
    /// Defaults to an empty stream.
    pub body: Option<Body>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one header value.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .get_or_insert_with(HeaderMap::new)
            .append(name, value);
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Merge onto `request`: the header map replaces the request's headers
    /// and the body replaces its body, each falling back to its default.
    pub fn apply(self, request: Request) -> Request {
        request
            .with_headers(self.headers.unwrap_or_default())
            .with_body(self.body.unwrap_or_default())
    }
}

#[derive(Debug)]
pub struct Client<E = UreqEngine> {
    transport: Transport<E>,
}

impl Client<UreqEngine> {
    pub fn new() -> Self {
        Self::with_config(&ClientConfig::default())
    }

    pub fn with_config(config: &ClientConfig) -> Self {
        Self::with_engine(UreqEngine::new(config))
    }
}

impl Default for Client<UreqEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Engine> Client<E> {
    pub fn with_engine(engine: E) -> Self {
        Self {
            transport: Transport::new(engine),
        }
    }

    pub fn engine(&self) -> &E {
        self.transport.engine()
    }

    pub fn engine_mut(&mut self) -> &mut E {
        self.transport.engine_mut()
    }

    /// Execute `request` and return whatever response the server produced.
    pub fn send_request(&mut self, request: Request) -> Result<Response, Error> {
        let (head, body) = request.into_parts();

        let mut stream = body.into_stream();
        if !stream.is_seekable() {
            let contents = stream
                .get_contents()
                .map_err(|e| request_error(&head, e.to_string()))?;
            stream = Box::new(BodyStream::from_bytes(contents));
        }
        let payload = stream
            .detach()
            .map_err(|e| request_error(&head, e.to_string()))?;

        log::debug!(
            "{} {} ({} header values, {} body bytes)",
            head.method,
            head.uri,
            head.headers.lines().len(),
            payload.len()
        );

        self.transport
            .configure(&head.method, &head.uri, head.headers.lines(), payload);
        let exchange = self
            .transport
            .execute()
            .map_err(|e| exchange_error(&head, e))?;

        let headers = codec::parse(&String::from_utf8_lossy(exchange.header_block()));
        let response = Response::new(exchange.status_code, headers, exchange.body().to_vec());

        log::debug!(
            "{} {} -> {} {:?} ({} headers, {} body bytes)",
            head.method,
            head.uri,
            response.status_code(),
            response.reason_phrase(),
            response.headers().len(),
            response.body().len()
        );
        Ok(response)
    }

    /// Merge `options` onto `request` and send it.
    pub fn send(&mut self, request: Request, options: RequestOptions) -> Result<Response, Error> {
        self.send_request(options.apply(request))
    }

    pub fn get(&mut self, uri: &str, options: RequestOptions) -> Result<Response, Error> {
        self.send_verb(Method::Get, uri, options)
    }

    pub fn post(&mut self, uri: &str, options: RequestOptions) -> Result<Response, Error> {
        self.send_verb(Method::Post, uri, options)
    }

    pub fn put(&mut self, uri: &str, options: RequestOptions) -> Result<Response, Error> {
        self.send_verb(Method::Put, uri, options)
    }

    pub fn patch(&mut self, uri: &str, options: RequestOptions) -> Result<Response, Error> {
        self.send_verb(Method::Patch, uri, options)
    }

    pub fn delete(&mut self, uri: &str, options: RequestOptions) -> Result<Response, Error> {
        self.send_verb(Method::Delete, uri, options)
    }

    pub fn head(&mut self, uri: &str, options: RequestOptions) -> Result<Response, Error> {
        self.send_verb(Method::Head, uri, options)
    }

    fn send_verb(&mut self, method: Method, uri: &str, options: RequestOptions) -> Result<Response, Error> {
        let request = options.apply(Request::new(method, Uri::from(uri)));
        self.send_request(request)
    }
}

fn request_error(head: &RequestHead, message: String) -> Error {
    Error::Request {
        message,
        request: Box::new(head.clone()),
    }
}

/// Wrap an engine failure into the client's error taxonomy.
fn exchange_error(head: &RequestHead, err: EngineError) -> Error {
    log::warn!("{} {} failed: {}", head.method, head.uri, err);
    match err.kind {
        FailureKind::Request => request_error(head, err.message),
        FailureKind::Network => Error::Network {
            message: err.message,
            request: Box::new(head.clone()),
            response: None,
        },
        FailureKind::Exchange => Error::Client {
            message: EXCHANGE_FAILED.to_string(),
            source: Some(err),
        },
    }
}
