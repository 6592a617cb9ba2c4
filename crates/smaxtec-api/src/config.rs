// ── Runtime client configuration ──
//
// Describes *how* a client connects: endpoint, credentials, dispatch mode and
// transport tuning. Never touches disk; `smaxtec-config` builds one of these
// from a profile.

use std::time::Duration;

use secrecy::SecretString;

use crate::auth::AuthStrategy;
use crate::transport::{DispatchMode, TlsMode, TransportConfig};

/// Configuration for a single API client. Immutable once handed to a client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL override. Falls back to the variant's default endpoint.
    pub endpoint: Option<String>,
    pub email: Option<String>,
    pub password: Option<SecretString>,
    /// Takes precedence over email/password when both are set.
    pub api_key: Option<SecretString>,
    /// Passed through to callers that format timestamps; the core ignores it.
    pub tz_aware: bool,
    pub mode: DispatchMode,
    pub transport: TransportConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            email: None,
            password: None,
            api_key: None,
            tz_aware: true,
            mode: DispatchMode::Sequential,
            transport: TransportConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    pub fn with_credentials(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self.password = Some(SecretString::from(password.into()));
        self
    }

    pub fn with_tz_aware(mut self, tz_aware: bool) -> Self {
        self.tz_aware = tz_aware;
        self
    }

    pub fn with_mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.transport.timeout = timeout;
        self
    }

    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.transport.tls = tls;
        self
    }

    /// Which login flow the session will run, if any credentials are set.
    pub fn auth_strategy(&self) -> Option<AuthStrategy> {
        if self.api_key.is_some() {
            Some(AuthStrategy::ApiKey)
        } else if self.email.is_some() || self.password.is_some() {
            Some(AuthStrategy::Password)
        } else {
            None
        }
    }
}
