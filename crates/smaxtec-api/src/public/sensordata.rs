// Chunked sensor-data queries. Long ranges are split so no single request
// spans more than `SENSORDATA_CHUNK_DAYS`.

use chrono::TimeDelta;
use serde_json::Value;

use super::PublicApi;
use crate::error::Error;
use crate::params::Params;
use crate::timerange::TimeRange;

/// Widest range a single `/data/query` request covers.
pub const SENSORDATA_CHUNK_DAYS: i64 = 100;

impl PublicApi {
    /// All points of `metric` for a device between two unix timestamps.
    pub async fn device_sensordata(
        &self,
        device_id: &str,
        metric: &str,
        from_date: i64,
        to_date: i64,
    ) -> Result<Vec<Value>, Error> {
        self.chunked_sensordata(("device_id", device_id), metric, from_date, to_date)
            .await
    }

    /// All points of `metric` for an animal between two unix timestamps.
    pub async fn animal_sensordata(
        &self,
        animal_id: &str,
        metric: &str,
        from_date: i64,
        to_date: i64,
    ) -> Result<Vec<Value>, Error> {
        self.chunked_sensordata(("animal_id", animal_id), metric, from_date, to_date)
            .await
    }

    async fn chunked_sensordata(
        &self,
        (id_key, id): (&str, &str),
        metric: &str,
        from_date: i64,
        to_date: i64,
    ) -> Result<Vec<Value>, Error> {
        let range = TimeRange::new(
            from_date,
            to_date,
            TimeDelta::days(SENSORDATA_CHUNK_DAYS).num_seconds(),
        )?;

        let mut data = Vec::new();
        for (from, to) in range.chunks() {
            let params = Params::new()
                .with(id_key, id)
                .with("metric", metric)
                .with("from_date", from)
                .with("to_date", to);
            let chunk = self.get_with("/data/query", params).await?;
            match chunk.get("data") {
                Some(Value::Array(points)) => data.extend(points.iter().cloned()),
                _ => {
                    return Err(Error::Deserialization {
                        message: "sensor data response without data array".into(),
                        body: chunk.to_string(),
                    });
                }
            }
        }
        Ok(data)
    }
}
