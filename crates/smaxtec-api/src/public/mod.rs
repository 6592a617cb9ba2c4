// Public v1 API
//
// Thin call sites over `ApiClient`, one file per resource group. Accepts an
// API key or email/password; sequential dispatch only.

mod annotations;
mod events;
mod organisations;
mod sensordata;

pub use annotations::AnnotationUpdate;
pub use sensordata::SENSORDATA_CHUNK_DAYS;

use serde_json::{Value, json};

use crate::auth::{ApiVariant, AuthStrategy};
use crate::client::{ApiClient, RequestOptions};
use crate::config::ClientConfig;
use crate::error::Error;
use crate::params::Params;

/// Client for the public smaXtec API (v1).
#[derive(Debug)]
pub struct PublicApi {
    client: ApiClient,
}

impl PublicApi {
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        Ok(Self {
            client: ApiClient::new(ApiVariant::PublicV1, config)?,
        })
    }

    /// The underlying client, for raw requests, history, and stats.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn uses_api_key(&self) -> bool {
        self.client.auth_strategy() == Some(AuthStrategy::ApiKey)
    }

    pub async fn status(&self) -> Result<Value, Error> {
        self.client
            .get("/service/status", RequestOptions::new())
            .await
    }

    /// Organisations visible to the logged-in user.
    ///
    /// API-key sessions are not bound to a user and always get an empty
    /// list without a request.
    pub async fn organisations(&self) -> Result<Value, Error> {
        if self.uses_api_key() {
            return Ok(Value::Array(Vec::new()));
        }
        self.client.get("/organisation", RequestOptions::new()).await
    }

    /// The current user, tagged with `"type"`: `"apikey"` (no request is
    /// made) or `"email"`.
    pub async fn user(&self) -> Result<Value, Error> {
        if self.uses_api_key() {
            return Ok(json!({"type": "apikey"}));
        }
        let mut user = self.client.get("/user", RequestOptions::new()).await?;
        if let Value::Object(fields) = &mut user {
            fields.insert("type".into(), Value::from("email"));
        }
        Ok(user)
    }

    pub async fn file_state(&self, file_id: &str) -> Result<Value, Error> {
        self.client
            .get(&format!("/user/files/{file_id}/state"), RequestOptions::new())
            .await
    }

    /// URL a file can be downloaded from. No request is made.
    pub fn download_link(&self, file_id: &str) -> String {
        self.client
            .to_url(&format!("/user/files/{file_id}/download"), None)
    }

    pub(crate) async fn get_with(&self, path: &str, query: Params) -> Result<Value, Error> {
        self.client
            .get(path, RequestOptions::new().query(query))
            .await
    }
}
