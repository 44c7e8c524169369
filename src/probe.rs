use log::debug;
use reqwest::{Client, Method};
use std::{fmt, time::Duration};

use crate::config::EndpointSpec;
use crate::error::Error;

/// Outcome of probing one endpoint once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthResult {
    Up,
    Down,
}

impl HealthResult {
    #[must_use]
    pub fn is_up(self) -> bool {
        self == HealthResult::Up
    }
}

impl fmt::Display for HealthResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthResult::Up => write!(f, "UP"),
            HealthResult::Down => write!(f, "DOWN"),
        }
    }
}

/// Issues health-check requests with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
}

impl Prober {
    /// Builds a prober whose requests are abandoned after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HttpClient`] if the underlying HTTP client cannot be
    /// constructed (e.g. the TLS backend fails to initialise).
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Probes `endpoint` once. Only a 2xx response counts as [`HealthResult::Up`].
    ///
    /// Every failure (non-2xx status, timeout, connection or TLS error) is
    /// reported as [`HealthResult::Down`]; nothing is propagated.
    pub async fn check(&self, endpoint: &EndpointSpec) -> HealthResult {
        debug!("checking availability of {}", endpoint.name);

        let Ok(method) = Method::from_bytes(endpoint.method.as_bytes()) else {
            debug!(
                "invalid method '{}' for {}, treating as DOWN",
                endpoint.method, endpoint.name
            );
            return HealthResult::Down;
        };

        let mut request = self.client.request(method, &endpoint.url);
        if let Some(headers) = &endpoint.headers {
            for (key, value) in headers {
                request = request.header(key, value);
            }
        }
        if let Some(body) = &endpoint.body {
            request = request.json(body);
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                debug!("{} tested as UP", endpoint.name);
                HealthResult::Up
            }
            Ok(response) => {
                debug!(
                    "{} responded with status {}",
                    endpoint.name,
                    response.status()
                );
                HealthResult::Down
            }
            Err(e) if e.is_timeout() => {
                debug!("timeout during availability check to {}", endpoint.url);
                HealthResult::Down
            }
            Err(e) => {
                debug!("error requesting url '{}': {e}", endpoint.url);
                HealthResult::Down
            }
        }
    }
}
