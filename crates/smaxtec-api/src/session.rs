// Session state
//
// The mutable half of a client: the lazily built transport, the bearer token,
// and its expiration. Only the auth flow writes it; the dispatcher reads a
// `SessionHandle` snapshot before every request.

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;
use crate::transport::{DispatchMode, Transport, TransportConfig};

#[derive(Debug, Default)]
pub(crate) struct Session {
    transport: Option<Transport>,
    token: Option<SecretString>,
    /// `None` until the first successful login.
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// The transport, built on first use.
    pub(crate) fn transport(
        &mut self,
        config: &TransportConfig,
        mode: DispatchMode,
    ) -> Result<&Transport, Error> {
        if self.transport.is_none() {
            self.transport = Some(Transport::build(config, mode)?);
        }
        self.transport
            .as_ref()
            .ok_or_else(|| Error::configuration("transport unavailable after build"))
    }

    /// `true` while a token is installed and `now < expires_at`.
    pub(crate) fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match (&self.token, self.expires_at) {
            (Some(_), Some(expires_at)) => now < expires_at,
            _ => false,
        }
    }

    pub(crate) fn install(&mut self, token: SecretString, lifetime: TimeDelta, now: DateTime<Utc>) {
        self.token = Some(token);
        self.expires_at = Some(now + lifetime);
    }

    /// Drop the token; the transport survives.
    pub(crate) fn invalidate(&mut self) {
        self.token = None;
        self.expires_at = None;
    }

    pub(crate) fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub(crate) fn handle(&self) -> Result<SessionHandle, Error> {
        match (&self.transport, &self.token) {
            (Some(transport), Some(token)) => Ok(SessionHandle {
                transport: transport.clone(),
                token: token.clone(),
            }),
            _ => Err(Error::Authentication {
                message: "session has no token".into(),
            }),
        }
    }
}

/// A ready-to-use, authenticated view of the session.
///
/// Returned by [`ApiClient::ensure_session`](crate::ApiClient::ensure_session).
/// Cloning is cheap; the underlying `reqwest::Client`s are reference counted.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub(crate) transport: Transport,
    token: SecretString,
}

impl SessionHandle {
    /// Attach the bearer credential to a request.
    pub fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.bearer_auth(self.token.expose_secret())
    }
}
