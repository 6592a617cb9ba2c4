// Session authentication
//
// Bearer-token lifecycle for every API variant. An API key is installed as
// the token directly; email/password sessions exchange the credentials at
// `GET /user/get_token` and re-login silently once the token expires.

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::client::{ApiClient, error_message};
use crate::config::ClientConfig;
use crate::error::Error;
use crate::session::SessionHandle;
use crate::transport::DispatchMode;

/// Default endpoint of the public v1 API.
pub const PUBLIC_API: &str = "https://api.smaxtec.com/api/v1";
/// Default endpoint of the public v2 API.
pub const PUBLIC_API_V2: &str = "https://api.smaxtec.com/api/v2";

const LOGIN_PATH: &str = "/user/get_token";
const API_KEY_LIFETIME_DAYS: i64 = 365;
const CREDENTIAL_LIFETIME_HOURS: i64 = 23;

/// Which authentication flow a session runs.
///
/// Marker enum (no data) -- the secrets live in [`ClientConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Static API key used as the bearer token.
    ApiKey,
    /// Email/password exchanged for a 23-hour token.
    Password,
}

/// The API surface a client talks to.
///
/// Determines the default endpoint and which configuration a client of
/// this kind accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVariant {
    PublicV1,
    PublicV2,
    PrivateV2,
    Intern,
}

impl ApiVariant {
    pub fn name(self) -> &'static str {
        match self {
            Self::PublicV1 => "public",
            Self::PublicV2 => "public v2",
            Self::PrivateV2 => "private v2",
            Self::Intern => "intern",
        }
    }

    /// The endpoint used when the configuration sets none. Private and
    /// intern deployments have no default.
    pub fn default_endpoint(self) -> Option<&'static str> {
        match self {
            Self::PublicV1 => Some(PUBLIC_API),
            Self::PublicV2 => Some(PUBLIC_API_V2),
            Self::PrivateV2 | Self::Intern => None,
        }
    }

    pub fn requires_endpoint(self) -> bool {
        self.default_endpoint().is_none()
    }

    /// Whether email/password login is available.
    pub fn allows_credentials(self) -> bool {
        matches!(self, Self::PublicV1 | Self::PublicV2)
    }

    /// Whether the client may run in [`DispatchMode::Concurrent`].
    pub fn allows_concurrency(self) -> bool {
        matches!(self, Self::PublicV2 | Self::PrivateV2)
    }

    /// Check `config` against this variant and return the base URL with any
    /// trailing slash removed.
    pub fn resolve_base_url(self, config: &ClientConfig) -> Result<String, Error> {
        let endpoint = config
            .endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .or_else(|| self.default_endpoint())
            .ok_or_else(|| {
                Error::configuration(format!("endpoint needed for the {} API", self.name()))
            })?;

        if !self.allows_credentials() && (config.email.is_some() || config.password.is_some()) {
            return Err(Error::configuration(format!(
                "the {} API authenticates with an API key only",
                self.name()
            )));
        }
        if config.mode == DispatchMode::Concurrent && !self.allows_concurrency() {
            return Err(Error::configuration(format!(
                "the {} API does not support concurrent dispatch",
                self.name()
            )));
        }

        Url::parse(endpoint)?;
        Ok(endpoint.trim_end_matches('/').to_owned())
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

impl ApiClient {
    /// Make sure the session holds a usable bearer token and return it.
    ///
    /// Builds the transport on first use. While the token is valid no HTTP
    /// call is made; otherwise the API key is installed, or the configured
    /// credentials are exchanged for a new token.
    pub async fn ensure_session(&self) -> Result<SessionHandle, Error> {
        let config = self.config();
        let mut session = self.session.lock().await;
        let http = session
            .transport(&config.transport, config.mode)?
            .follow
            .clone();

        let now = Utc::now();
        if session.is_valid_at(now) {
            return session.handle();
        }

        if let Some(key) = &config.api_key {
            debug!("installing API key as bearer token");
            session.install(key.clone(), TimeDelta::days(API_KEY_LIFETIME_DAYS), now);
            return session.handle();
        }

        let (Some(email), Some(password)) = (config.email.as_deref(), config.password.as_ref())
        else {
            return Err(Error::configuration(
                "email and password are needed for API access",
            ));
        };

        let token = self.acquire_token(&http, email, password).await?;
        session.install(
            token,
            TimeDelta::hours(CREDENTIAL_LIFETIME_HOURS),
            Utc::now(),
        );
        debug!("session token installed");
        session.handle()
    }

    /// When the current token expires, or `None` before the first login.
    pub async fn session_expires_at(&self) -> Option<DateTime<Utc>> {
        self.session.lock().await.expires_at()
    }

    /// Drop the current token so the next request authenticates again.
    pub async fn invalidate_session(&self) {
        self.session.lock().await.invalidate();
    }

    async fn acquire_token(
        &self,
        http: &reqwest::Client,
        email: &str,
        password: &SecretString,
    ) -> Result<SecretString, Error> {
        let url = self.resolve(LOGIN_PATH, None)?;
        debug!("requesting session token at {}", url);

        let resp = http
            .get(url.clone())
            .query(&[("email", email), ("password", password.expose_secret())])
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if matches!(status.as_u16(), 401 | 409 | 422) {
            return Err(Error::InvalidCredentials);
        }
        if status.is_client_error() {
            let raw = resp.text().await.unwrap_or_default();
            return Err(Error::Client {
                status: status.as_u16(),
                message: error_message(&raw),
            });
        }
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let raw = resp.text().await.map_err(Error::Transport)?;
        let parsed: TokenResponse =
            serde_json::from_str(&raw).map_err(|e| Error::Authentication {
                message: format!("unusable token response: {e}"),
            })?;
        Ok(SecretString::from(parsed.token))
    }
}
