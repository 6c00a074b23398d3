//! Raw header block codec.
//!
//! # Design
//! The engine returns one combined buffer: every status line it saw (one per
//! redirect hop), the header lines of every hop, blank separators, then the
//! body. Parsing is best effort and never fails: status lines are removed
//! wherever they occur, lines without a colon become anonymous entries, and
//! repeated names keep all of their values.

use crate::headers::HeaderMap;

const STATUS_PREFIX: &str = "HTTP/";

/// Remove every status line (`HTTP/<d>[.<d>] <ddd>[ <reason>]`) from `block`.
///
/// The scan is not anchored to line starts and removes all matches, so the
/// blocks of every redirect hop are handled alike. The line terminator after a
/// match is left in place.
pub fn strip_status_lines(block: &str) -> String {
    let mut out = String::with_capacity(block.len());
    let mut rest = block;

    while let Some(idx) = rest.find(STATUS_PREFIX) {
        out.push_str(&rest[..idx]);
        let candidate = &rest[idx..];
        match status_line_len(candidate) {
            Some(len) => {
                log::trace!("stripped status line {:?}", &candidate[..len]);
                rest = &candidate[len..];
            }
            None => {
                out.push_str(STATUS_PREFIX);
                rest = &candidate[STATUS_PREFIX.len()..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Length of the status line starting at `s`, if `s` starts with one.
fn status_line_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = STATUS_PREFIX.len();

    // version: <d> or <d>.<d>
    if !bytes.get(i)?.is_ascii_digit() {
        return None;
    }
    i += 1;
    if bytes.get(i) == Some(&b'.') {
        if !bytes.get(i + 1)?.is_ascii_digit() {
            return None;
        }
        i += 2;
    }

    if bytes.get(i) != Some(&b' ') {
        return None;
    }
    i += 1;

    let code = bytes.get(i..i + 3)?;
    if !code.iter().all(u8::is_ascii_digit) {
        return None;
    }
    i += 3;

    match bytes.get(i) {
        None | Some(b'\r') | Some(b'\n') => Some(i),
        Some(b' ') => {
            let reason = bytes[i..]
                .iter()
                .position(|&b| b == b'\r' || b == b'\n')
                .unwrap_or(bytes.len() - i);
            Some(i + reason)
        }
        Some(_) => None,
    }
}

/// Parse a raw header block into a header map.
pub fn parse(block: &str) -> HeaderMap {
    let stripped = strip_status_lines(block);
    let mut headers = HeaderMap::new();

    for line in stripped.split("\r\n") {
        if line.is_empty() {
            continue;
        }
        match line.split_once(':') {
            Some((name, value)) => headers.append(name.trim(), value.trim()),
            None => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                log::trace!("header line without a colon: {line:?}");
                headers.push_anonymous(line);
            }
        }
    }
    headers
}

/// Render `Name: value\r\n` per value. Anonymous entries are dropped.
pub fn render(headers: &HeaderMap) -> String {
    headers
        .lines()
        .into_iter()
        .map(|line| line + "\r\n")
        .collect()
}

/// Split a combined buffer into header block and body at `header_size`.
///
/// A header size past the end of the buffer is clamped, leaving an empty body.
pub fn split_response(buffer: &[u8], header_size: usize) -> (&[u8], &[u8]) {
    buffer.split_at(header_size.min(buffer.len()))
}
