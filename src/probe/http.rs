//! HTTP GET probe.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;

use super::{Probe, ProbeError};

/// Issues a GET and compares the response status with the expected one.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    url: String,
    expected_status: u16,
    timeout: Duration,
    headers: BTreeMap<String, String>,
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            expected_status: 200,
            timeout,
            headers: BTreeMap::new(),
            client: probe_client(),
        }
    }

    pub fn expected_status(mut self, status: u16) -> Self {
        self.expected_status = status;
        self
    }

    pub fn headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }
}

/// Probes target the local host's services directly; proxy settings from
/// the environment are ignored.
fn probe_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}

#[async_trait]
impl Probe for HttpProbe {
    async fn run(&self) -> Result<(), ProbeError> {
        tracing::trace!(url = %self.url, "Probing");

        let mut request = self.client.get(&self.url).timeout(self.timeout);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProbeError::Timeout {
                    target: self.url.clone(),
                    after: self.timeout,
                }
            } else {
                ProbeError::Request {
                    url: self.url.clone(),
                    message: e.to_string(),
                }
            }
        })?;

        let actual = response.status().as_u16();
        if actual != self.expected_status {
            return Err(ProbeError::UnexpectedStatus {
                expected: self.expected_status,
                actual,
            });
        }
        Ok(())
    }
}
