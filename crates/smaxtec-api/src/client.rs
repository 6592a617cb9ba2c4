// API client core
//
// One configurable client shared by every API variant: URL construction
// with version rewriting, the four HTTP verbs, concurrent fan-out, request
// history, and status classification. Endpoint modules (public, intern,
// etc.) wrap this type and add inherent methods per resource.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{LazyLock, Mutex, PoisonError};
use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use regex::{NoExpand, Regex};
use reqwest::{Method, StatusCode};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::auth::{ApiVariant, AuthStrategy};
use crate::config::ClientConfig;
use crate::error::Error;
use crate::history::{RequestHistory, RequestRecord};
use crate::params::Params;
use crate::session::{Session, SessionHandle};
use crate::transport::{DispatchMode, MAX_CONCURRENT_REQUESTS};

static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

static VERSION_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/[vV][0-9]+/").expect("version pattern is valid"));

/// Extract `message` from a JSON error object, or `"unknown"`.
///
/// Only an object body counts; arrays and scalars never carry a message.
pub(crate) fn error_message(raw: &str) -> String {
    serde_json::from_str::<Map<String, Value>>(raw)
        .ok()
        .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| "unknown".into())
}

/// Per-request settings.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Sent as the query string.
    pub query: Option<Params>,
    /// Sent as a JSON object body.
    pub body: Option<Params>,
    /// Replaces every `/vN/` segment of the URL, e.g. `"v1"`.
    pub version: Option<String>,
    /// Overrides the transport timeout for this request.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, params: Params) -> Self {
        self.query = Some(params);
        self
    }

    pub fn json(mut self, params: Params) -> Self {
        self.body = Some(params);
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Authenticated HTTP client for one smaXtec API deployment.
///
/// Holds the immutable configuration, the lazily created session, and the
/// request history. Every call resolves all of its HTTP work before it
/// returns.
///
/// A client must not be driven from independent caller tasks without
/// external synchronization; concurrency is internal to
/// [`async_get`](Self::async_get).
pub struct ApiClient {
    id: u64,
    base_url: String,
    variant: ApiVariant,
    config: ClientConfig,
    pub(crate) session: tokio::sync::Mutex<Session>,
    history: Mutex<RequestHistory>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("id", &self.id)
            .field("base_url", &self.base_url)
            .field("variant", &self.variant)
            .field("mode", &self.config.mode)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Validate `config` for `variant` and create an unauthenticated
    /// client. No network traffic happens until the first request.
    pub fn new(variant: ApiVariant, config: ClientConfig) -> Result<Self, Error> {
        let base_url = variant.resolve_base_url(&config)?;
        Ok(Self {
            id: NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed),
            base_url,
            variant,
            config,
            session: tokio::sync::Mutex::new(Session::default()),
            history: Mutex::new(RequestHistory::new()),
        })
    }

    /// Process-unique identity of this client. Per-client caches key on it
    /// so one client's credentials never answer for another's.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn variant(&self) -> ApiVariant {
        self.variant
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn mode(&self) -> DispatchMode {
        self.config.mode
    }

    pub fn tz_aware(&self) -> bool {
        self.config.tz_aware
    }

    pub fn auth_strategy(&self) -> Option<AuthStrategy> {
        self.config.auth_strategy()
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `base_url + path`, with every `/vN/` segment replaced by
    /// `/{version}/` when a version is given.
    pub fn to_url(&self, path: &str, version: Option<&str>) -> String {
        let url = format!("{}{path}", self.base_url);
        match version {
            Some(v) => VERSION_SEGMENT
                .replace_all(&url, NoExpand(&format!("/{v}/")))
                .into_owned(),
            None => url,
        }
    }

    pub(crate) fn resolve(&self, path: &str, version: Option<&str>) -> Result<Url, Error> {
        Ok(Url::parse(&self.to_url(path, version))?)
    }

    // ── Request history ──────────────────────────────────────────────

    fn record(&self, record: RequestRecord) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    /// Snapshot of the retained request records, oldest first.
    pub fn history(&self) -> Vec<RequestRecord> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .records()
            .cloned()
            .collect()
    }

    pub fn total_requests(&self) -> u64 {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .total_requests()
    }

    /// `"<n> Requests"` followed by one timing line per retained record.
    pub fn stats(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stats()
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<Value, Error> {
        self.dispatch(Method::GET, path, &options).await
    }

    /// POST a request. Redirects are never followed.
    pub async fn post(&self, path: &str, options: RequestOptions) -> Result<Value, Error> {
        self.dispatch(Method::POST, path, &options).await
    }

    /// PUT a request. Redirects are never followed.
    pub async fn put(&self, path: &str, options: RequestOptions) -> Result<Value, Error> {
        self.dispatch(Method::PUT, path, &options).await
    }

    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<Value, Error> {
        self.dispatch(Method::DELETE, path, &options).await
    }

    /// GET every path through a pool of at most
    /// [`MAX_CONCURRENT_REQUESTS`] requests in flight.
    ///
    /// Results come back in submission order as `(json, url)`. A request
    /// that fails is logged and left out of the result; only failures that
    /// happen before anything is sent (session, URL) fail the whole call.
    pub async fn async_get<I, P>(
        &self,
        paths: I,
        options: RequestOptions,
    ) -> Result<Vec<(Value, String)>, Error>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        if self.config.mode != DispatchMode::Concurrent {
            return Err(Error::UnsupportedOperation(
                "async_get is only available on a client in concurrent mode",
            ));
        }

        let session = self.ensure_session().await?;
        let urls = paths
            .into_iter()
            .map(|path| self.resolve(path.as_ref(), options.version.as_deref()))
            .collect::<Result<Vec<_>, _>>()?;

        let session = &session;
        let options = &options;
        let outcomes: Vec<(Url, Result<Value, Error>)> = stream::iter(urls)
            .map(|url| async move {
                let result = self.execute(session, Method::GET, url.clone(), options).await;
                (url, result)
            })
            .buffered(MAX_CONCURRENT_REQUESTS)
            .collect()
            .await;

        let mut results = Vec::with_capacity(outcomes.len());
        for (url, outcome) in outcomes {
            match outcome {
                Ok(json) => results.push((json, url.to_string())),
                Err(e) => warn!(%url, error = %e, "skipping failed request"),
            }
        }
        Ok(results)
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> Result<Value, Error> {
        let session = self.ensure_session().await?;
        let url = self.resolve(path, options.version.as_deref())?;
        self.execute(&session, method, url, options).await
    }

    async fn execute(
        &self,
        session: &SessionHandle,
        method: Method,
        url: Url,
        options: &RequestOptions,
    ) -> Result<Value, Error> {
        let writes = method == Method::POST || method == Method::PUT;
        let http = if writes {
            &session.transport.no_follow
        } else {
            &session.transport.follow
        };

        debug!("{} {}", method, url);

        let mut builder = session.authorize(http.request(method.clone(), url.clone()));
        if let Some(query) = &options.query {
            builder = builder.query(&query.to_query_pairs());
        }
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let record = RequestRecord::start(url.as_str());
        let resp = match builder.send().await {
            Ok(resp) => resp,
            Err(e) => {
                self.record(record.fail());
                return Err(Error::Transport(e));
            }
        };
        let status = resp.status();
        self.record(record.finish(status.as_u16()));

        if writes && status == StatusCode::MOVED_PERMANENTLY {
            return Err(Error::Redirect {
                method: if method == Method::POST { "POST" } else { "PUT" },
                url: url.to_string(),
            });
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

        let body = resp.text().await.map_err(Error::Transport)?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}
