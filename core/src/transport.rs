//! The I/O seam between request building and response parsing.
//!
//! `Transport` is the only place a network call happens. `UreqTransport`
//! is the blocking implementation used by `MovieApi::from_config`; tests
//! substitute their own. A relative URL no proxy rule resolves fails with
//! a boxed `ApiError::Config`, which `MovieApi` unwraps again.

use tracing::debug;

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
///
/// Implementations return every HTTP status as data. Only failures that
/// produced no response at all (connect, timeout, I/O) are errors.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport built on a shared `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    config: ClientConfig,
}

impl UreqTransport {
    pub fn new(config: ClientConfig) -> Self {
        // Status handling belongs to the response interceptor.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout()))
            .build()
            .new_agent();
        Self { agent, config }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.config.resolve_url(&request.url())?;
        debug!(method = %request.method, %url, "sending request");

        let mut response = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(&url), &request.headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&url), &request.headers).call(),
            HttpMethod::Post | HttpMethod::Put => {
                let builder = if request.method == HttpMethod::Post {
                    self.agent.post(&url)
                } else {
                    self.agent.put(&url)
                };
                let builder = with_headers(builder, &request.headers);
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        }?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
