//! Request and response body streams.
//!
//! # Design
//! A `Stream` is consumed exactly once per request execution. The client
//! detaches it right before dispatch, which hands the unread bytes over to
//! the transport and leaves the stream inert: every later call fails with
//! `StreamError::Detached`.
//!
//! `BodyStream` is the in-memory, seekable implementation and the one the
//! client always ends up sending. `ReaderStream` adapts any `std::io::Read`
//! for callers that produce bodies incrementally; it is not seekable, so the
//! client copies it into a `BodyStream` before use.

use std::fmt;
use std::io::Read;

use crate::error::StreamError;

/// A single-use body source.
pub trait Stream: fmt::Debug + Send {
    /// Whether the stream supports random access / rewind.
    fn is_seekable(&self) -> bool;

    /// Total byte length, if known.
    fn get_size(&self) -> Result<Option<u64>, StreamError>;

    /// All bytes from the current cursor to the end. Leaves the cursor at the end.
    fn get_contents(&mut self) -> Result<Vec<u8>, StreamError>;

    /// Hand the bytes from the cursor on to the caller and invalidate the stream.
    fn detach(&mut self) -> Result<Vec<u8>, StreamError>;
}

/// Seekable in-memory stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyStream {
    buf: Option<Vec<u8>>,
    pos: usize,
}

impl BodyStream {
    /// Allocate a fresh buffer holding `data`, with the cursor at 0.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self {
            buf: Some(data.into()),
            pos: 0,
        }
    }

    pub fn empty() -> Self {
        Self::from_bytes(Vec::new())
    }

    pub fn is_detached(&self) -> bool {
        self.buf.is_none()
    }

    /// Current cursor position.
    pub fn tell(&self) -> Result<usize, StreamError> {
        self.buffer().map(|_| self.pos)
    }

    pub fn rewind(&mut self) -> Result<(), StreamError> {
        self.seek(0)
    }

    /// Move the cursor to `pos`, clamped to the end of the buffer.
    pub fn seek(&mut self, pos: usize) -> Result<(), StreamError> {
        let len = self.buffer()?.len();
        self.pos = pos.min(len);
        Ok(())
    }

    fn buffer(&self) -> Result<&[u8], StreamError> {
        self.buf.as_deref().ok_or(StreamError::Detached)
    }
}

impl Default for BodyStream {
    fn default() -> Self {
        Self::empty()
    }
}

impl Stream for BodyStream {
    fn is_seekable(&self) -> bool {
        true
    }

    fn get_size(&self) -> Result<Option<u64>, StreamError> {
        Ok(Some(self.buffer()?.len() as u64))
    }

    fn get_contents(&mut self) -> Result<Vec<u8>, StreamError> {
        let buf = self.buf.as_deref().ok_or(StreamError::Detached)?;
        let start = self.pos.min(buf.len());
        let contents = buf[start..].to_vec();
        self.pos = buf.len();
        Ok(contents)
    }

    fn detach(&mut self) -> Result<Vec<u8>, StreamError> {
        let mut buf = self.buf.take().ok_or(StreamError::Detached)?;
        let start = std::mem::take(&mut self.pos).min(buf.len());
        Ok(buf.split_off(start))
    }
}

/// Non-seekable stream over an arbitrary reader.
pub struct ReaderStream<R> {
    reader: Option<R>,
}

impl<R: Read + Send> ReaderStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
        }
    }

    fn drain(&mut self) -> Result<Vec<u8>, StreamError> {
        let reader = self.reader.as_mut().ok_or(StreamError::Detached)?;
        let mut out = Vec::new();
        reader.read_to_end(&mut out).map_err(StreamError::Read)?;
        Ok(out)
    }
}

impl<R> fmt::Debug for ReaderStream<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderStream")
            .field("detached", &self.reader.is_none())
            .finish()
    }
}

impl<R: Read + Send> Stream for ReaderStream<R> {
    fn is_seekable(&self) -> bool {
        false
    }

    fn get_size(&self) -> Result<Option<u64>, StreamError> {
        match self.reader {
            Some(_) => Ok(None),
            None => Err(StreamError::Detached),
        }
    }

    fn get_contents(&mut self) -> Result<Vec<u8>, StreamError> {
        self.drain()
    }

    fn detach(&mut self) -> Result<Vec<u8>, StreamError> {
        let rest = self.drain()?;
        self.reader = None;
        Ok(rest)
    }
}
