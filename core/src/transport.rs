//! The network seam between the dispatcher and an HTTP library.
//!
//! # Design
//! The dispatcher only ever sees `HttpRequest` and `HttpResponse` values; a
//! `Transport` moves one across the wire. `UreqTransport` is the blocking
//! default. Tests plug in their own implementation to return canned
//! responses or simulated connection failures.

use std::error::Error;
use std::sync::Arc;

use tracing::warn;
use ureq::tls::TlsConfig;
use ureq::{Agent, RequestBuilder};

use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Low-level cause of a failed round-trip, kept as the source of `ApiError::Transport`.
pub type TransportError = Box<dyn Error + Send + Sync + 'static>;

/// Executes exactly one HTTP round-trip.
///
/// Any status code the server answers with is a successful send; only a
/// round-trip that never produced a response is an `Err`.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

/// Blocking transport backed by a single `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    /// Configures the agent once. Turning verification off only affects this
    /// agent and is announced with a single warning.
    pub fn new(tls_verify: bool) -> Self {
        if !tls_verify {
            warn!("TLS certificate verification disabled for this client");
        }
        let tls = TlsConfig::builder().disable_verification(!tls_verify).build();
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .tls_config(tls)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.as_str();
        let body = request.body.as_deref().map(str::as_bytes);

        let result = match (request.method, body) {
            (HttpMethod::Get, None) => decorate(self.agent.get(url), request).call(),
            (HttpMethod::Get, Some(body)) => decorate(self.agent.get(url), request)
                .force_send_body()
                .send(body),
            (HttpMethod::Delete, None) => decorate(self.agent.delete(url), request).call(),
            (HttpMethod::Delete, Some(body)) => decorate(self.agent.delete(url), request)
                .force_send_body()
                .send(body),
            (HttpMethod::Post, None) => decorate(self.agent.post(url), request).send_empty(),
            (HttpMethod::Post, Some(body)) => decorate(self.agent.post(url), request).send(body),
            (HttpMethod::Put, None) => decorate(self.agent.put(url), request).send_empty(),
            (HttpMethod::Put, Some(body)) => decorate(self.agent.put(url), request).send(body),
        };

        let mut response = result?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                let value = value.to_str().ok()?;
                Some((name.as_str().to_string(), value.to_string()))
            })
            .collect();
        // No size cap and no text conversion; the dispatcher owns decoding.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

fn decorate<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    for (key, value) in &request.query {
        builder = builder.query(key, value);
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refused_connection_is_an_error() {
        // Bind then drop to get a port nothing listens on.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: format!("http://127.0.0.1:{port}/api/v2/form.json"),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        };
        assert!(UreqTransport::new(false).send(&request).is_err());
    }
}
