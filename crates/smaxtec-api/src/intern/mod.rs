// Intern API
//
// Operator-facing endpoints: bulk sensor data, device and organisation
// administration, accounts, users. API-key only, explicit endpoint,
// sequential dispatch. Several resources live under the v1 path of the
// deployment and are reached through a version override.

mod accounts;
mod animals;
mod devices;
mod events;
mod organisations;
mod sensordata;
mod users;

pub use accounts::AccountInfo;
pub use devices::DeviceInclude;
pub use events::NewEvent;
pub use sensordata::SensorDataSeries;

use serde_json::Value;
use tracing::error;

use crate::auth::ApiVariant;
use crate::client::{ApiClient, RequestOptions};
use crate::config::ClientConfig;
use crate::error::Error;
use crate::params::Params;

const V1: &str = "v1";

/// Client for an intern deployment.
#[derive(Debug)]
pub struct InternApi {
    client: ApiClient,
}

impl InternApi {
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        Ok(Self {
            client: ApiClient::new(ApiVariant::Intern, config)?,
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn status(&self) -> Result<Value, Error> {
        self.client.get("/", RequestOptions::new()).await
    }

    /// `true` when the status endpoint answers with a non-empty body.
    pub async fn healthy(&self) -> bool {
        match self.status().await {
            Ok(status) if is_truthy(&status) => true,
            Ok(status) => {
                error!(%status, "status not ok");
                false
            }
            Err(e) => {
                error!(error = %e, "status not ok");
                false
            }
        }
    }

    async fn get_query(&self, path: &str, query: Params) -> Result<Value, Error> {
        self.client
            .get(path, RequestOptions::new().query(query))
            .await
    }
}

/// Options for requests against the v1 path.
fn v1() -> RequestOptions {
    RequestOptions::new().version(V1)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// The first element of an array response.
fn first_item(value: Value) -> Result<Value, Error> {
    match value {
        Value::Array(items) => items.into_iter().next().ok_or_else(|| Error::Deserialization {
            message: "expected a non-empty array".into(),
            body: "[]".into(),
        }),
        other => Err(Error::Deserialization {
            message: "expected an array".into(),
            body: other.to_string(),
        }),
    }
}
