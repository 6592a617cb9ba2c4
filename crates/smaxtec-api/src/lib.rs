// smaxtec-api: Async Rust client for the smaXtec animal-monitoring APIs
// (public v1/v2, private v2, intern)

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod history;
pub mod intern;
pub mod memo;
pub mod pagination;
pub mod params;
pub mod private_v2;
pub mod public;
pub mod public_v2;
mod session;
pub mod timerange;
pub mod transport;

pub use auth::{ApiVariant, AuthStrategy, PUBLIC_API, PUBLIC_API_V2};
pub use client::{ApiClient, RequestOptions};
pub use config::ClientConfig;
pub use error::Error;
pub use history::{RequestHistory, RequestRecord};
pub use intern::InternApi;
pub use memo::Memoize;
pub use params::Params;
pub use private_v2::PrivateApiV2;
pub use public::PublicApi;
pub use public_v2::{DataQuery, PublicApiV2};
pub use session::SessionHandle;
pub use timerange::TimeRange;
pub use transport::{DispatchMode, TlsMode, TransportConfig};
