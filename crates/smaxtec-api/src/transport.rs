// Shared transport configuration for building reqwest::Client instances.
//
// A session owns two clients built from the same settings: one that follows
// redirects (GET, DELETE, token acquisition) and one that never does
// (POST, PUT). Pool sizing follows the dispatch mode.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::redirect::Policy;

use crate::error::Error;

/// Upper bound on requests in flight during a concurrent fan-out.
pub const MAX_CONCURRENT_REQUESTS: usize = 20;

/// TLS verification mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (local test deployments only).
    DangerAcceptInvalid,
}

/// How a client schedules its HTTP calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchMode {
    /// One request at a time.
    #[default]
    Sequential,
    /// Adds fan-out (`async_get`) through a pool of
    /// [`MAX_CONCURRENT_REQUESTS`] connections.
    Concurrent,
}

impl DispatchMode {
    /// Maximum number of requests this mode keeps in flight.
    pub fn max_in_flight(self) -> usize {
        match self {
            Self::Sequential => 1,
            Self::Concurrent => MAX_CONCURRENT_REQUESTS,
        }
    }
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            user_agent: format!("smaxtec-api/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    ///
    /// `follow_redirects == false` disables redirect handling entirely, so a
    /// 3xx surfaces to the caller as-is.
    pub fn build_client(
        &self,
        mode: DispatchMode,
        follow_redirects: bool,
    ) -> Result<reqwest::Client, Error> {
        let policy = if follow_redirects {
            Policy::default()
        } else {
            Policy::none()
        };

        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .redirect(policy)
            .pool_max_idle_per_host(mode.max_in_flight());

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// The HTTP handles a session dispatches through.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    /// Follows redirects. Used for reads, deletes, and login.
    pub follow: reqwest::Client,
    /// Never follows redirects. Used for POST and PUT.
    pub no_follow: reqwest::Client,
}

impl Transport {
    pub(crate) fn build(config: &TransportConfig, mode: DispatchMode) -> Result<Self, Error> {
        Ok(Self {
            follow: config.build_client(mode, true)?,
            no_follow: config.build_client(mode, false)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concurrent_mode_uses_the_fan_out_ceiling() {
        assert_eq!(DispatchMode::Sequential.max_in_flight(), 1);
        assert_eq!(DispatchMode::Concurrent.max_in_flight(), 20);
    }

    #[test]
    fn missing_ca_file_is_a_tls_error() {
        let config = TransportConfig {
            tls: TlsMode::CustomCa(PathBuf::from("/nonexistent/ca.pem")),
            ..TransportConfig::default()
        };
        let result = config.build_client(DispatchMode::Sequential, true);
        assert!(matches!(result, Err(Error::Tls(_))));
    }

    #[test]
    fn default_user_agent_names_the_crate() {
        let config = TransportConfig::default();
        assert!(config.user_agent.starts_with("smaxtec-api/"));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
