//! Transport adapter over a pluggable HTTP engine.
//!
//! # Design
//! An `Engine` is the opaque component that performs the network exchange.
//! It receives the wire-level parameters of one call and returns the whole
//! response as a single buffer (status lines and header block first, body
//! after) along with the header block length. Keeping the engine behind a
//! trait lets tests script exchanges without a socket.
//!
//! `Transport` owns exactly one engine handle and drives it one call at a
//! time:
//!
//! ```text
//! Idle -> Configured -> Executed -> Success | Failed
//! ```
//!
//! Configuring the next call returns it to the start. Every method takes
//! `&mut self`, so a transport can never run two calls at once.

use crate::codec;
use crate::error::{EngineError, FailureKind};
use crate::message::{Method, Uri};

/// Transfer options applied to every call. Not caller configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferPolicy {
    pub follow_redirects: bool,
    pub max_redirects: u32,
    /// Return the response to the caller instead of writing it elsewhere.
    pub return_transfer: bool,
    /// Prefix the body with the header block of every hop.
    pub include_header: bool,
}

impl TransferPolicy {
    pub const FIXED: TransferPolicy = TransferPolicy {
        follow_redirects: true,
        max_redirects: 5,
        return_transfer: true,
        include_header: true,
    };
}

/// Wire-level parameters of one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineRequest {
    pub method: String,
    pub url: String,
    /// One `Name: value` line per header value.
    pub header_lines: Vec<String>,
    pub body: Vec<u8>,
    pub body_len: u64,
    pub policy: TransferPolicy,
}

/// Raw result of one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineResponse {
    /// Header block followed by the body.
    pub buffer: Vec<u8>,
    pub status_code: u16,
    /// Byte length of the header block at the start of `buffer`.
    pub header_size: usize,
}

/// The opaque HTTP engine.
pub trait Engine {
    /// Run one complete exchange, following redirects and buffering the
    /// whole response.
    fn perform(&mut self, request: &EngineRequest) -> Result<EngineResponse, EngineError>;
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn perform(&mut self, request: &EngineRequest) -> Result<EngineResponse, EngineError> {
        (**self).perform(request)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Idle,
    Configured,
    Executed,
    Success,
    Failed,
}

/// A successful exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub status_code: u16,
    pub header_size: usize,
    pub buffer: Vec<u8>,
}

impl Exchange {
    pub fn header_block(&self) -> &[u8] {
        codec::split_response(&self.buffer, self.header_size).0
    }

    pub fn body(&self) -> &[u8] {
        codec::split_response(&self.buffer, self.header_size).1
    }
}

impl From<EngineResponse> for Exchange {
    fn from(response: EngineResponse) -> Self {
        Self {
            status_code: response.status_code,
            header_size: response.header_size,
            buffer: response.buffer,
        }
    }
}

#[derive(Debug)]
pub struct Transport<E> {
    engine: E,
    state: TransportState,
    pending: Option<EngineRequest>,
}

impl<E: Engine> Transport<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            state: TransportState::Idle,
            pending: None,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Set up the next call, replacing anything left from the previous one.
    pub fn configure(&mut self, method: &Method, uri: &Uri, header_lines: Vec<String>, body: Vec<u8>) {
        let body_len = body.len() as u64;
        self.pending = Some(EngineRequest {
            method: method.as_str().to_string(),
            url: uri.as_str().to_string(),
            header_lines,
            body,
            body_len,
            policy: TransferPolicy::FIXED,
        });
        self.state = TransportState::Configured;
    }

    /// Run the configured call.
    pub fn execute(&mut self) -> Result<Exchange, EngineError> {
        let Some(request) = self.pending.take() else {
            return Err(EngineError::new(
                FailureKind::Request,
                "transport executed without a configured request",
            ));
        };

        self.state = TransportState::Executed;
        match self.engine.perform(&request) {
            Ok(response) => {
                self.state = TransportState::Success;
                Ok(response.into())
            }
            Err(err) => {
                self.state = TransportState::Failed;
                Err(err)
            }
        }
    }
}
