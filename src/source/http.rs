//! HTTP fetch capability for URL fragments.

use std::io::Read;
use std::time::Duration;

use thiserror::Error;

/// Upper bound on a fetched body (32 MiB).
const MAX_BODY_BYTES: u64 = 32 * 1024 * 1024;

/// Status and body of a GET request, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Network-level failure (DNS, connect, TLS, timeout, truncated body).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Capability: issue a GET and report the status, or a transport error.
pub trait HttpGet: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// Default client: a shared ureq agent with connect and read timeouts.
#[derive(Debug, Clone)]
pub struct UreqClient {
    agent: ureq::Agent,
    max_body: u64,
}

impl UreqClient {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .build();
        Self {
            agent,
            max_body: MAX_BODY_BYTES,
        }
    }

    /// Override the body size limit.
    pub fn with_max_body(mut self, bytes: u64) -> Self {
        self.max_body = bytes;
        self
    }
}

impl Default for UreqClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

impl HttpGet for UreqClient {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let response = match self.agent.get(url).call() {
            Ok(resp) => resp,
            // Keep error statuses as responses: the resolver decides what fails
            Err(ureq::Error::Status(_, resp)) => resp,
            Err(ureq::Error::Transport(err)) => return Err(TransportError(err.to_string())),
        };
        let status = response.status();
        let body = read_body(response.into_reader(), self.max_body)?;
        Ok(HttpResponse { status, body })
    }
}

/// Read a whole body, failing when it exceeds `limit` bytes.
fn read_body(reader: impl Read, limit: u64) -> Result<Vec<u8>, TransportError> {
    let mut body = Vec::new();
    reader
        .take(limit.saturating_add(1))
        .read_to_end(&mut body)
        .map_err(|e| TransportError(format!("reading body: {e}")))?;
    if body.len() as u64 > limit {
        return Err(TransportError(format!("body exceeds {limit} bytes")));
    }
    Ok(body)
}
