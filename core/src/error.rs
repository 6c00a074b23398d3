//! Error types for the HTTP client.
//!
//! # Design
//! Only a failure to obtain any response at all is an error. A 4xx or 5xx
//! status is a valid `Response` and is returned normally.
//!
//! `Error` has three kinds. `Client` is the generic "no response" failure and
//! keeps the engine's own report as its source instead of exposing it in the
//! message. `Network` covers connectivity failures (DNS, connect, TLS,
//! timeout). `Request` covers requests rejected before any network activity.
//! Both of the latter carry the head of the originating request.

use std::io;

use thiserror::Error;

use crate::message::{RequestHead, Response};

/// Message of every `Error::Client` raised for a failed exchange.
pub const EXCHANGE_FAILED: &str = "An error occurred while processing the request.";

#[derive(Debug, Error)]
pub enum Error {
    #[error("{message}")]
    Client {
        message: String,
        #[source]
        source: Option<EngineError>,
    },

    #[error("network error: {message}")]
    Network {
        message: String,
        request: Box<RequestHead>,
        response: Option<Box<Response>>,
    },

    #[error("invalid request: {message}")]
    Request {
        message: String,
        request: Box<RequestHead>,
    },
}

impl Error {
    /// The head of the originating request, when the error carries one.
    pub fn request(&self) -> Option<&RequestHead> {
        match self {
            Error::Client { .. } => None,
            Error::Network { request, .. } | Error::Request { request, .. } => Some(&**request),
        }
    }

    /// A partially received response, if the engine produced one.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Error::Network { response, .. } => response.as_deref(),
            _ => None,
        }
    }
}

/// Errors raised by body streams.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("stream is detached")]
    Detached,

    #[error("failed to read stream: {0}")]
    Read(#[source] io::Error),
}

/// Classification of an engine failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request was rejected before any network activity.
    Request,
    /// DNS, connect, TLS, timeout or socket I/O failure.
    Network,
    /// Any other failure to retrieve a response.
    Exchange,
}

/// A failure reported by the HTTP engine.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct EngineError {
    pub kind: FailureKind,
    pub message: String,
}

impl EngineError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn exchange(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Exchange, message)
    }
}

/// Errors raised while loading a `ClientConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid client config: {0}")]
    Parse(#[from] toml::de::Error),
}
