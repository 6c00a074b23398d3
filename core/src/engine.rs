//! Default engine on top of `ureq`.
//!
//! # Design
//! The agent never follows redirects itself. `perform` walks the hops: every
//! response's status line and headers are appended to the header block, and a
//! 3xx carrying `Location` is followed until `TransferPolicy::max_redirects`
//! is used up. Only the final hop's body is buffered. The combined buffer is
//! the transport's format: per hop a status line, one line per header value
//! and a blank line, then the body. `header_size` covers every hop.
//!
//! 303, and 301/302 after a POST, continue as a body-less GET. Other
//! redirects repeat the method and body.
//!
//! Status codes are never errors here (`http_status_as_error(false)`). Only a
//! failure to obtain a response at all is reported, classified by
//! `FailureKind`.
//!
//! Header names come back lowercased, since the `http` types normalize them.
//! Lookups through `HeaderMap` are case-insensitive, so only the spelling in
//! the rendered block differs from what the server sent.

use std::fmt;

use ureq::http;
use ureq::{Agent, SendBody};

use crate::config::ClientConfig;
use crate::error::{EngineError, FailureKind};
use crate::transport::{Engine, EngineRequest, EngineResponse};

pub struct UreqEngine {
    agent: Agent,
    user_agent: Option<String>,
    max_response_bytes: Option<u64>,
}

impl UreqEngine {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .max_redirects_will_error(false)
            .timeout_global(config.timeout)
            .build()
            .new_agent();

        Self {
            agent,
            user_agent: config.user_agent.clone(),
            max_response_bytes: config.max_response_bytes,
        }
    }

    fn build(
        &self,
        method: &str,
        url: &str,
        header_lines: &[String],
    ) -> Result<http::request::Builder, EngineError> {
        let mut builder = http::Request::builder().method(method).uri(url);

        let mut has_user_agent = false;
        for line in header_lines {
            let (name, value) = line.split_once(':').ok_or_else(|| {
                EngineError::new(FailureKind::Request, format!("malformed header line {line:?}"))
            })?;
            let name = name.trim();
            if name.eq_ignore_ascii_case("user-agent") {
                has_user_agent = true;
            }
            builder = builder.header(name, value.trim());
        }

        if let (false, Some(user_agent)) = (has_user_agent, &self.user_agent) {
            builder = builder.header("User-Agent", user_agent.as_str());
        }
        Ok(builder)
    }

    /// One hop: a single request and its unread response.
    fn send(
        &self,
        method: &str,
        url: &str,
        header_lines: &[String],
        body: &[u8],
    ) -> Result<http::Response<ureq::Body>, EngineError> {
        let builder = self.build(method, url, header_lines)?;
        let result = if body.is_empty() && !method_takes_body(method) {
            let http_request = builder.body(SendBody::none()).map_err(rejected)?;
            self.agent.run(http_request)
        } else {
            let http_request = builder.body(body.to_vec()).map_err(rejected)?;
            self.agent.run(http_request)
        };
        result.map_err(classify)
    }
}

impl Default for UreqEngine {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

impl fmt::Debug for UreqEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqEngine")
            .field("user_agent", &self.user_agent)
            .field("max_response_bytes", &self.max_response_bytes)
            .finish()
    }
}

impl Engine for UreqEngine {
    fn perform(&mut self, request: &EngineRequest) -> Result<EngineResponse, EngineError> {
        let policy = request.policy;
        let mut method = request.method.clone();
        let mut url = request.url.clone();
        let mut body = request.body.as_slice();
        let mut head = String::new();
        let mut redirects = 0;

        loop {
            let mut response = self.send(&method, &url, &request.header_lines, body)?;
            let status = response.status();
            render_head(&response, &mut head);

            let location = response
                .headers()
                .get(http::header::LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            match location {
                Some(location) if policy.follow_redirects && status.is_redirection() => {
                    if redirects == policy.max_redirects {
                        return Err(EngineError::exchange(format!(
                            "maximum ({}) redirects followed",
                            policy.max_redirects
                        )));
                    }
                    redirects += 1;

                    let next = resolve_location(&url, &location)?;
                    log::debug!("{method} {url} -> {}, following to {next}", status.as_u16());
                    if switches_to_get(status.as_u16(), &method) {
                        method = "GET".to_string();
                        body = &[];
                    }
                    url = next;
                }
                _ => {
                    let payload = response
                        .body_mut()
                        .with_config()
                        .limit(self.max_response_bytes.unwrap_or(u64::MAX))
                        .read_to_vec()
                        .map_err(classify)?;

                    let header_size = head.len();
                    let mut buffer = head.into_bytes();
                    buffer.extend_from_slice(&payload);

                    return Ok(EngineResponse {
                        buffer,
                        status_code: status.as_u16(),
                        header_size,
                    });
                }
            }
        }
    }
}

/// Append one hop's status line, header lines and blank line to `out`.
fn render_head<B>(response: &http::Response<B>, out: &mut String) {
    let status = response.status();
    out.push_str(&format!("{:?} {}", response.version(), status.as_u16()));
    if let Some(reason) = status.canonical_reason() {
        out.push(' ');
        out.push_str(reason);
    }
    out.push_str("\r\n");
    for (name, value) in response.headers() {
        out.push_str(name.as_str());
        out.push_str(": ");
        out.push_str(&String::from_utf8_lossy(value.as_bytes()));
        out.push_str("\r\n");
    }
    out.push_str("\r\n");
}

/// Resolve a `Location` value against the URL that produced it.
fn resolve_location(base: &str, location: &str) -> Result<String, EngineError> {
    let unfollowable =
        |why: &str| EngineError::exchange(format!("cannot follow redirect to {location:?}: {why}"));

    if location
        .parse::<http::Uri>()
        .is_ok_and(|uri| uri.scheme().is_some())
    {
        return Ok(location.to_string());
    }

    let base: http::Uri = base.parse().map_err(|_| unfollowable("invalid base url"))?;
    let (Some(scheme), Some(authority)) = (base.scheme_str(), base.authority()) else {
        return Err(unfollowable("base url is not absolute"));
    };

    if let Some(rest) = location.strip_prefix("//") {
        return Ok(format!("{scheme}://{rest}"));
    }
    if location.starts_with('/') {
        return Ok(format!("{scheme}://{authority}{location}"));
    }
    let path = base.path();
    if location.starts_with('?') {
        return Ok(format!("{scheme}://{authority}{path}{location}"));
    }
    let dir = &path[..path.rfind('/').map_or(0, |i| i + 1)];
    let dir = if dir.is_empty() { "/" } else { dir };
    Ok(format!("{scheme}://{authority}{dir}{location}"))
}

fn switches_to_get(status: u16, method: &str) -> bool {
    (status == 303 && method != "HEAD") || (matches!(status, 301 | 302) && method == "POST")
}

fn method_takes_body(method: &str) -> bool {
    matches!(method, "POST" | "PUT" | "PATCH")
}

fn rejected(err: http::Error) -> EngineError {
    EngineError::new(FailureKind::Request, err.to_string())
}

fn classify(err: ureq::Error) -> EngineError {
    let kind = match &err {
        ureq::Error::BadUri(_) | ureq::Error::Http(_) => FailureKind::Request,
        ureq::Error::HostNotFound
        | ureq::Error::ConnectionFailed
        | ureq::Error::Timeout(_)
        | ureq::Error::Io(_)
        | ureq::Error::Tls(_)
        | ureq::Error::Rustls(_) => FailureKind::Network,
        _ => FailureKind::Exchange,
    };
    EngineError::new(kind, err.to_string())
}
