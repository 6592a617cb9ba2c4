// Public v2 API
//
// Per-animal data and organisation animal lists, each with a concurrent
// fan-out form for clients built in `DispatchMode::Concurrent`.

use serde_json::Value;

use crate::auth::ApiVariant;
use crate::client::{ApiClient, RequestOptions};
use crate::config::ClientConfig;
use crate::error::Error;
use crate::params::Params;

/// Query for `/data/animals/{id}.json`.
#[derive(Debug, Clone, Default)]
pub struct DataQuery {
    pub from_date: Option<Value>,
    pub to_date: Option<Value>,
    pub metrics: Vec<String>,
    pub preferred_units: Option<Value>,
    pub aggregation_period: Option<String>,
    pub timestamp_format: Option<String>,
}

impl DataQuery {
    pub fn new(from_date: impl Into<Value>, to_date: impl Into<Value>) -> Self {
        Self {
            from_date: Some(from_date.into()),
            to_date: Some(to_date.into()),
            ..Self::default()
        }
    }

    pub fn metric(mut self, metric: impl Into<String>) -> Self {
        self.metrics.push(metric.into());
        self
    }

    pub fn aggregation_period(mut self, period: impl Into<String>) -> Self {
        self.aggregation_period = Some(period.into());
        self
    }

    pub fn timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = Some(format.into());
        self
    }

    pub fn to_params(&self) -> Params {
        Params::new()
            .with("from_date", self.from_date.clone())
            .with("to_date", self.to_date.clone())
            .with("metrics", self.metrics.clone())
            .with("preferred_units", self.preferred_units.clone())
            .with("aggregation_period", self.aggregation_period.clone())
            .with("timestamp_format", self.timestamp_format.clone())
    }
}

/// Client for the public smaXtec API (v2).
#[derive(Debug)]
pub struct PublicApiV2 {
    client: ApiClient,
}

impl PublicApiV2 {
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        Ok(Self {
            client: ApiClient::new(ApiVariant::PublicV2, config)?,
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn animals_by_organisation(&self, organisation_id: &str) -> Result<Value, Error> {
        self.client
            .get(&animals_path(organisation_id), RequestOptions::new())
            .await
    }

    /// Animal lists of several organisations, fetched concurrently. Failed
    /// organisations are left out; each entry is `(json, url)`.
    pub async fn animals_by_organisations(
        &self,
        organisation_ids: &[&str],
    ) -> Result<Vec<(Value, String)>, Error> {
        let paths = organisation_ids.iter().map(|id| animals_path(id));
        self.client.async_get(paths, RequestOptions::new()).await
    }

    pub async fn data_by_animal(&self, animal_id: &str, query: &DataQuery) -> Result<Value, Error> {
        self.client
            .get(
                &animal_data_path(animal_id),
                RequestOptions::new().query(query.to_params()),
            )
            .await
    }

    /// Data of several animals, fetched concurrently with one shared query.
    pub async fn data_by_animals(
        &self,
        animal_ids: &[&str],
        query: &DataQuery,
    ) -> Result<Vec<(Value, String)>, Error> {
        let paths = animal_ids.iter().map(|id| animal_data_path(id));
        self.client
            .async_get(paths, RequestOptions::new().query(query.to_params()))
            .await
    }
}

fn animals_path(organisation_id: &str) -> String {
    format!("/organisations/{organisation_id}/animals")
}

fn animal_data_path(animal_id: &str) -> String {
    format!("/data/animals/{animal_id}.json")
}
