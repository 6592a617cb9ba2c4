// Private v2 API: API-key only, explicit endpoint.

use serde_json::Value;

use crate::auth::ApiVariant;
use crate::client::{ApiClient, RequestOptions};
use crate::config::ClientConfig;
use crate::error::Error;
use crate::params::Params;

/// Client for a private v2 deployment.
#[derive(Debug)]
pub struct PrivateApiV2 {
    client: ApiClient,
}

impl PrivateApiV2 {
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        Ok(Self {
            client: ApiClient::new(ApiVariant::PrivateV2, config)?,
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn data_by_animal(
        &self,
        animal_id: &str,
        from_date: impl Into<Value>,
        to_date: impl Into<Value>,
        metrics: &[&str],
    ) -> Result<Value, Error> {
        let query = Params::new()
            .with("from_date", from_date)
            .with("to_date", to_date)
            .with("metrics", metrics);
        self.client
            .get(
                &format!("/{animal_id}/data.json"),
                RequestOptions::new().query(query),
            )
            .await
    }

    pub async fn events_by_animal(
        &self,
        animal_id: &str,
        deleted_events: bool,
    ) -> Result<Value, Error> {
        let query = Params::new().with("deleted_events", deleted_events);
        self.client
            .get(
                &format!("/data/animals/{animal_id}/events"),
                RequestOptions::new().query(query),
            )
            .await
    }
}
