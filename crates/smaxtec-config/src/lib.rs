//! Profile configuration for smaXtec API clients.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `smaxtec_api::ClientConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use smaxtec_api::{ApiVariant, ClientConfig, DispatchMode, TlsMode, TransportConfig};

const KEYRING_SERVICE: &str = "smaxtec";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{0}' not found")]
    UnknownProfile(String),

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named API profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up a profile by name, or the default profile when `name` is
    /// `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, p)| (k.as_str(), p))
            .ok_or_else(|| ConfigError::UnknownProfile(name.into()))
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_tz_aware")]
    pub tz_aware: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            tz_aware: default_tz_aware(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_tz_aware() -> bool {
    true
}

/// A named API profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Base URL override. Required for `private_v2` and `intern`.
    pub endpoint: Option<String>,

    /// API variant: "public", "public_v2", "private_v2", or "intern".
    #[serde(default = "default_variant")]
    pub variant: String,

    /// Login email (public variants only).
    pub email: Option<String>,

    /// Password (plaintext; prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// API key (plaintext; prefer keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Override the global timezone-awareness default.
    pub tz_aware: Option<bool>,

    /// Use concurrent dispatch (v2 variants only).
    #[serde(default)]
    pub concurrent: bool,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification.
    pub insecure: Option<bool>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            endpoint: None,
            variant: default_variant(),
            email: None,
            password: None,
            password_env: None,
            api_key: None,
            api_key_env: None,
            tz_aware: None,
            concurrent: false,
            timeout: None,
            ca_cert: None,
            insecure: None,
        }
    }
}

fn default_variant() -> String {
    "public".into()
}

/// Parse a profile's `variant` field.
pub fn parse_variant(raw: &str) -> Result<ApiVariant, ConfigError> {
    match raw {
        "public" | "public_v1" => Ok(ApiVariant::PublicV1),
        "public_v2" => Ok(ApiVariant::PublicV2),
        "private_v2" => Ok(ApiVariant::PrivateV2),
        "intern" => Ok(ApiVariant::Intern),
        other => Err(ConfigError::Validation {
            field: "variant".into(),
            reason: format!(
                "expected 'public', 'public_v2', 'private_v2', or 'intern', got '{other}'"
            ),
        }),
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "smaxtec", "smaxtec").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("smaxtec");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from an explicit file, layered under `SMAXTEC_` env vars.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SMAXTEC_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_secret(profile_name: &str, kind: &str) -> Option<SecretString> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{kind}")).ok()?;
    entry.get_password().ok().map(SecretString::from)
}

/// Resolve an API key: env var named by `api_key_env`, then the system
/// keyring, then the plaintext field.
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    // 1. Profile's api_key_env → env var lookup
    if let Some(val) = profile
        .api_key_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
    {
        return Some(SecretString::from(val));
    }

    // 2. System keyring
    if let Some(secret) = keyring_secret(profile_name, "api-key") {
        return Some(secret);
    }

    // 3. Plaintext in config
    profile.api_key.clone().map(SecretString::from)
}

/// Resolve email + password. The password follows the same chain as the
/// API key, with `SMAXTEC_PASSWORD` as a fallback env var.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<(String, SecretString), ConfigError> {
    let no_credentials = || ConfigError::NoCredentials {
        profile: profile_name.into(),
    };

    let email = profile
        .email
        .clone()
        .or_else(|| std::env::var("SMAXTEC_EMAIL").ok())
        .ok_or_else(no_credentials)?;

    // 1. Env var
    let from_env = profile
        .password_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
        .or_else(|| std::env::var("SMAXTEC_PASSWORD").ok());
    if let Some(pw) = from_env {
        return Ok((email, SecretString::from(pw)));
    }

    // 2. Keyring
    if let Some(pw) = keyring_secret(profile_name, "password") {
        return Ok((email, pw));
    }

    // 3. Plaintext in config
    profile
        .password
        .clone()
        .map(|pw| (email, SecretString::from(pw)))
        .ok_or_else(no_credentials)
}

/// Build a `ClientConfig` from a profile.
///
/// An API key wins over email/password. Variant capability rules
/// (endpoint required, API-key only, concurrency) are checked here so
/// configuration mistakes surface before any client is built.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<(ApiVariant, ClientConfig), ConfigError> {
    let variant = parse_variant(&profile.variant)?;

    if let Some(endpoint) = &profile.endpoint {
        url::Url::parse(endpoint).map_err(|_| ConfigError::Validation {
            field: "endpoint".into(),
            reason: format!("invalid URL: {endpoint}"),
        })?;
    } else if variant.requires_endpoint() {
        return Err(ConfigError::Validation {
            field: "endpoint".into(),
            reason: format!("required for the {} API", variant.name()),
        });
    }

    let mode = if profile.concurrent {
        if !variant.allows_concurrency() {
            return Err(ConfigError::Validation {
                field: "concurrent".into(),
                reason: format!("not supported by the {} API", variant.name()),
            });
        }
        DispatchMode::Concurrent
    } else {
        DispatchMode::Sequential
    };

    let mut config = ClientConfig {
        endpoint: profile.endpoint.clone(),
        tz_aware: profile.tz_aware.unwrap_or(defaults.tz_aware),
        mode,
        transport: transport_config(profile, defaults),
        ..ClientConfig::default()
    };

    if let Some(key) = resolve_api_key(profile, profile_name) {
        config.api_key = Some(key);
    } else if variant.allows_credentials() {
        let (email, password) = resolve_credentials(profile, profile_name)?;
        config.email = Some(email);
        config.password = Some(password);
    } else {
        return Err(ConfigError::NoCredentials {
            profile: profile_name.into(),
        });
    }

    Ok((variant, config))
}

fn transport_config(profile: &Profile, defaults: &Defaults) -> TransportConfig {
    let tls = if profile.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    TransportConfig {
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        ..TransportConfig::default()
    }
}
