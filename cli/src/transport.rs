//! Executes core `HttpRequest`s over the network with ureq.

use anyhow::{Context, Result};
use bookrec_core::{HttpMethod, HttpRequest, HttpResponse};

pub(crate) struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    /// Status codes are returned as data; the core client interprets them.
    pub(crate) fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    pub(crate) fn execute(&self, req: HttpRequest) -> Result<HttpResponse> {
        log::debug!("Sending {} {}", req.method, req.url);

        let mut response = match req.method {
            HttpMethod::Get => with_headers(self.agent.get(&req.url), &req.headers).call(),
            HttpMethod::Post => with_headers(self.agent.post(&req.url), &req.headers).send_empty(),
            HttpMethod::Put => with_headers(self.agent.put(&req.url), &req.headers).send_empty(),
        }
        .with_context(|| format!("Unable to send the request to {}", req.url))?;

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
            .context("Unable to read the response body")?;
        log::trace!("{} {} -> {}", req.method, req.url, status);

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
        builder = builder.header(name, value);
    }
    builder
}
