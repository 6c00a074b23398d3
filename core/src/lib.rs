//! Minimal blocking HTTP client.
//!
//! # Overview
//! `Client::send_request` takes a `Request` (method, URI, headers, body),
//! runs it through a pluggable engine and returns a structured `Response`
//! (status, reason phrase, headers, body) or a typed `Error`.
//!
//! # Design
//! - `stream`: single-use body streams; bodies are detached before dispatch.
//! - `codec`: pure functions between raw header blocks and `HeaderMap`,
//!   tolerant of redirect chains, repeated headers and malformed lines.
//! - `transport`: the `Engine` boundary and the `Transport` adapter that owns
//!   one engine handle and applies the fixed transfer policy.
//! - `engine`: the default `ureq`-backed engine.
//! - `client`: orchestration plus per-verb helpers and `RequestOptions`.
//!
//! Everything is synchronous. A client is driven through `&mut self`, so one
//! instance never runs two requests at once.

pub mod client;
pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod headers;
pub mod message;
pub mod status;
pub mod stream;
pub mod transport;

pub use client::{Client, RequestOptions};
pub use config::ClientConfig;
pub use engine::UreqEngine;
pub use error::{ConfigError, EngineError, Error, FailureKind, StreamError};
pub use headers::HeaderMap;
pub use message::{Body, Method, Request, RequestHead, Response, Uri};
pub use stream::{BodyStream, ReaderStream, Stream};
pub use transport::{Engine, EngineRequest, EngineResponse, TransferPolicy, Transport, TransportState};
