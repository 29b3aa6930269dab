//! Client configuration.

use std::env;
use std::time::Duration;

use reqwest::Client;

use doku_types::{ConfigError, Environment};

use crate::transport::ExactCaseTransport;

/// Endpoint and transport settings shared by both clients.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub environment: Environment,
    /// Overrides the environment's base URL (e.g. a mock server).
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            ..Default::default()
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// - `DOKU_ENVIRONMENT`: `production` or `staging` (default `staging`)
    /// - `DOKU_BASE_URL`: optional base URL override
    /// - `DOKU_TIMEOUT_SECS`, `DOKU_CONNECT_TIMEOUT_SECS`: optional timeouts
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("DOKU_ENVIRONMENT") {
            Ok(value) => value.parse()?,
            Err(_) => Environment::default(),
        };

        let base_url = env::var("DOKU_BASE_URL").ok().filter(|u| !u.is_empty());
        let timeout = secs_from_env("DOKU_TIMEOUT_SECS")?;
        let connect_timeout = secs_from_env("DOKU_CONNECT_TIMEOUT_SECS")?;

        Ok(Self {
            environment,
            base_url,
            timeout,
            connect_timeout,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub(crate) fn disbursement_url(&self) -> String {
        self.resolve(self.environment.disbursement_url())
    }

    pub(crate) fn repayment_url(&self) -> String {
        self.resolve(self.environment.repayment_url())
    }

    /// Builds the underlying HTTP client with the configured timeouts.
    pub(crate) fn http_client(&self) -> Result<Client, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        builder.build()
    }

    /// Transport for requests whose header names must keep their case.
    pub(crate) fn exact_case_transport(&self) -> ExactCaseTransport {
        ExactCaseTransport::new(self.timeout, self.connect_timeout)
    }

    fn resolve(&self, preset: &str) -> String {
        normalize_base_url(self.base_url.as_deref().unwrap_or(preset))
    }
}

pub(crate) fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn secs_from_env(key: &'static str) -> Result<Option<Duration>, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => value
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let config = ClientConfig::new(Environment::Production);
        assert_eq!(config.disbursement_url(), "https://kirimdoku.com/v2/api");
        assert_eq!(config.repayment_url(), "https://pay.doku.com");
    }

    #[test]
    fn test_override_trims_trailing_slash() {
        let config = ClientConfig::default().with_base_url("http://localhost:8080/");
        assert_eq!(config.disbursement_url(), "http://localhost:8080");
        assert_eq!(config.repayment_url(), "http://localhost:8080");
    }

    #[test]
    fn test_http_client_with_timeouts() {
        let config = ClientConfig::default().with_timeout(Duration::from_secs(5));
        assert!(config.http_client().is_ok());
    }
}
