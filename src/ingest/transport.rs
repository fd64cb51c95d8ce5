/// HTTP transport seam.
///
/// The USGS client never talks to `reqwest` directly; it goes through the
/// `Transport` trait so tests can substitute an in-memory double and count
/// outbound calls.

use std::time::Duration;

/// A fully read HTTP response: status code plus body text.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure to obtain any response at all (DNS, connect, TLS, reset, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct TransportError {
    pub message: String,
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Request failed: {}", self.message)
    }
}

impl std::error::Error for TransportError {}

/// Performs a single GET and returns the response, whatever its status.
///
/// Implementations must not retry.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// Blocking `reqwest` transport used in production.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Builds a client. `timeout` of `None` leaves the request unbounded.
    pub fn new(timeout: Option<Duration>, user_agent: &str) -> Result<Self, TransportError> {
        let mut builder = reqwest::blocking::Client::builder().user_agent(user_agent.to_string());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| TransportError { message: e.to_string() })?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| TransportError { message: e.to_string() })?;

        let status = response.status().as_u16();
        // An unreadable error body is treated as empty so the status survives.
        let body = match response.text() {
            Ok(text) => text,
            Err(e) if (200..300).contains(&status) => {
                return Err(TransportError { message: e.to_string() });
            }
            Err(_) => String::new(),
        };

        Ok(HttpResponse { status, body })
    }
}
