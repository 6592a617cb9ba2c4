// Bulk sensor data.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use super::{InternApi, first_item};
use crate::client::RequestOptions;
use crate::error::Error;
use crate::params::Params;

const BULK_WRITE_TIMEOUT: Duration = Duration::from_secs(25);
const BULK_READ_TIMEOUT: Duration = Duration::from_secs(15);

/// One metric's points for a device or a group, as the bulk endpoints take
/// them. Points are `(timestamp, value)` and numeric by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorDataSeries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub metric: String,
    pub data: Vec<(Number, Number)>,
}

impl SensorDataSeries {
    pub fn for_device(
        device_id: impl Into<String>,
        metric: impl Into<String>,
        points: impl IntoIterator<Item = (i64, f64)>,
    ) -> Result<Self, Error> {
        let metric = metric.into();
        Ok(Self {
            device_id: Some(device_id.into()),
            group_id: None,
            data: numeric_points(&metric, points)?,
            metric,
        })
    }

    pub fn for_group(
        group_id: impl Into<String>,
        metric: impl Into<String>,
        points: impl IntoIterator<Item = (i64, f64)>,
    ) -> Result<Self, Error> {
        let metric = metric.into();
        Ok(Self {
            device_id: None,
            group_id: Some(group_id.into()),
            data: numeric_points(&metric, points)?,
            metric,
        })
    }
}

/// JSON has no NaN or infinity, so those values are rejected up front.
fn numeric_points(
    metric: &str,
    points: impl IntoIterator<Item = (i64, f64)>,
) -> Result<Vec<(Number, Number)>, Error> {
    points
        .into_iter()
        .map(|(ts, value)| {
            Number::from_f64(value)
                .map(|v| (Number::from(ts), v))
                .ok_or_else(|| {
                    Error::InvalidArgument(format!(
                        "invalid value point ({ts}, {value}) of metric {metric}"
                    ))
                })
        })
        .collect()
}

impl InternApi {
    pub async fn insert_sensor_data(&self, series: SensorDataSeries) -> Result<Value, Error> {
        first_item(self.insert_sensor_data_bulk(&[series]).await?)
    }

    pub async fn insert_sensor_data_bulk(
        &self,
        series: &[SensorDataSeries],
    ) -> Result<Value, Error> {
        self.client()
            .put("/sensordatabulk", bulk_body(series)?)
            .await
    }

    pub async fn update_sensor_data(&self, series: SensorDataSeries) -> Result<Value, Error> {
        first_item(self.update_sensor_data_bulk(&[series]).await?)
    }

    pub async fn update_sensor_data_bulk(
        &self,
        series: &[SensorDataSeries],
    ) -> Result<Value, Error> {
        self.client()
            .post("/sensordatabulk", bulk_body(series)?)
            .await
    }

    pub async fn sensor_data(
        &self,
        device_id: &str,
        metric: &str,
        from_date: i64,
        to_date: i64,
    ) -> Result<Value, Error> {
        first_item(
            self.sensor_data_bulk(device_id, &[metric], from_date, to_date)
                .await?,
        )
    }

    pub async fn sensor_data_range(&self, device_id: &str, metric: &str) -> Result<Value, Error> {
        let query = Params::new()
            .with("device_id", device_id)
            .with("metric", metric);
        self.get_query("/sensordatarange", query).await
    }

    pub async fn sensor_data_bulk(
        &self,
        device_id: &str,
        metrics: &[&str],
        from_date: i64,
        to_date: i64,
    ) -> Result<Value, Error> {
        let query = Params::new()
            .with("device_id", device_id)
            .with("metrics", metrics)
            .with("from_date", from_date)
            .with("to_date", to_date);
        self.client()
            .get(
                "/sensordatabulk",
                RequestOptions::new().query(query).timeout(BULK_READ_TIMEOUT),
            )
            .await
    }

    pub async fn last_sensor_data(&self, device_id: &str, metric: &str) -> Result<Value, Error> {
        first_item(self.last_sensor_data_bulk(device_id, &[metric]).await?)
    }

    pub async fn last_sensor_data_bulk(
        &self,
        device_id: &str,
        metrics: &[&str],
    ) -> Result<Value, Error> {
        let query = Params::new()
            .with("device_id", device_id)
            .with("metrics", metrics);
        self.get_query("/lastsensordata", query).await
    }

    pub async fn group_sensor_data_bulk(
        &self,
        group_id: &str,
        metrics: &[&str],
        from_date: i64,
        to_date: i64,
    ) -> Result<Value, Error> {
        let query = Params::new()
            .with("group_id", group_id)
            .with("metrics", metrics)
            .with("from_date", from_date)
            .with("to_date", to_date);
        self.client()
            .get(
                "/groupsensordatabulk",
                RequestOptions::new().query(query).timeout(BULK_READ_TIMEOUT),
            )
            .await
    }

    pub async fn insert_group_sensor_data_bulk(
        &self,
        series: &[SensorDataSeries],
    ) -> Result<Value, Error> {
        self.client()
            .put("/groupsensordatabulk", bulk_body(series)?)
            .await
    }
}

fn bulk_body(series: &[SensorDataSeries]) -> Result<RequestOptions, Error> {
    let encoded = serde_json::to_value(series).map_err(|e| Error::InvalidArgument(e.to_string()))?;
    Ok(RequestOptions::new()
        .json(Params::new().with("sensordata", encoded))
        .timeout(BULK_WRITE_TIMEOUT))
}
