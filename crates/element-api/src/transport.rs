// Transport configuration for building reqwest::Client instances.
//
// The Elements platform is a hosted TLS service, so there is no certificate
// knob here -- just the per-request timeout that bounds every call the
// client makes, pagination and probe loops included.

use std::time::Duration;

use crate::error::Error;

/// Transport configuration for the HTTP client.
///
/// The timeout applies to each individual request. A paginated fetch issues
/// several requests and each one gets the full timeout; there is no overall
/// deadline across pages.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("element-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Transport)
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
