//! Executing requests.
//!
//! Clients never perform I/O themselves. A [`Transport`] takes the
//! `HttpRequest` a `build_*` method produced and returns the `HttpResponse`
//! for the matching `parse_*` method. With the `ureq` feature (on by
//! default) [`UreqTransport`] provides a blocking implementation.

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Performs one HTTP round trip.
///
/// Non-2xx statuses must be returned as responses, not errors; status
/// interpretation belongs to the `parse_*` methods. `Err` is reserved for
/// failures to complete the exchange at all.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "ureq")]
mod blocking {
    use std::fmt;

    use tracing::trace;
    use ureq::typestate::{WithBody, WithoutBody};
    use ureq::{Agent, RequestBuilder};

    use super::Transport;
    use crate::config::ClientConfig;
    use crate::error::ApiError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport backed by a `ureq::Agent`.
    ///
    /// The agent is configured so 4xx/5xx responses come back as data.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: Agent,
    }

    impl fmt::Debug for UreqTransport {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("UreqTransport").finish_non_exhaustive()
        }
    }

    impl UreqTransport {
        pub fn new(config: &ClientConfig) -> Self {
            let agent = Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(config.timeout)
                .build()
                .new_agent();
            Self { agent }
        }

        /// Wrap an existing agent. It must not turn statuses into errors.
        pub fn from_agent(agent: Agent) -> Self {
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new(&ClientConfig::default())
        }
    }

    fn headers<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    fn send(builder: RequestBuilder<WithBody>, request: &HttpRequest) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        let builder = headers(builder, request);
        match &request.body {
            Some(body) => builder.send(body.as_bytes()),
            None => builder.send_empty(),
        }
    }

    fn call(builder: RequestBuilder<WithoutBody>, request: &HttpRequest) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        headers(builder, request).call()
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            trace!(method = %request.method, path = %request.path, "executing request");
            let path = request.path.as_str();
            let result = match request.method {
                HttpMethod::Get => call(self.agent.get(path), &request),
                HttpMethod::Delete if request.body.is_none() => call(self.agent.delete(path), &request),
                HttpMethod::Delete => send(self.agent.delete(path).force_send_body(), &request),
                HttpMethod::Post => send(self.agent.post(path), &request),
                HttpMethod::Put => send(self.agent.put(path), &request),
                HttpMethod::Patch => send(self.agent.patch(path), &request),
            };
            let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|value| (name.as_str().to_string(), value.to_string()))
                })
                .collect();
            let body = response
                .body_mut()
                .read_to_string()
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            trace!(status, bytes = body.len(), "received response");

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}
