// Device administration.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::{InternApi, v1};
use crate::client::RequestOptions;
use crate::error::Error;
use crate::params::Params;

/// Related records to embed in a device lookup. All on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInclude {
    pub animal: bool,
    pub organisation: bool,
    pub allmeta: bool,
}

impl Default for DeviceInclude {
    fn default() -> Self {
        Self {
            animal: true,
            organisation: true,
            allmeta: true,
        }
    }
}

impl InternApi {
    pub async fn device(&self, device_id: &str, include: DeviceInclude) -> Result<Value, Error> {
        let query = Params::new()
            .with("device_id", device_id)
            .with("with_animal", u8::from(include.animal))
            .with("with_organisation", u8::from(include.organisation))
            .with("with_allmeta", u8::from(include.allmeta));
        self.get_query("/device", query).await
    }

    pub async fn set_device_meta(
        &self,
        device_id: &str,
        metadata: Map<String, Value>,
    ) -> Result<Value, Error> {
        let body = Params::new()
            .with("device_id", device_id)
            .with("metadata", metadata)
            .with("namespace", "anthill");
        self.client()
            .post("/devicemetadata", RequestOptions::new().json(body))
            .await
    }

    pub async fn sensor_info(&self, device_id: &str) -> Result<Value, Error> {
        self.get_query("/sensorinfo", Params::new().with("device_id", device_id))
            .await
    }

    /// Online statistics for the `hours_back` hours before `to_ts` (or now).
    pub async fn devices_seen(
        &self,
        device_id: &str,
        hours_back: u32,
        return_sum: bool,
        to_ts: Option<i64>,
    ) -> Result<Value, Error> {
        let query = Params::new()
            .with("device_id", device_id)
            .with("hours_back", hours_back)
            .with("return_sum", u8::from(return_sum))
            .with("to_ts", to_ts);
        self.get_query("/devicesonline", query).await
    }

    pub async fn node_infos(
        &self,
        device_id: &str,
        from_date: i64,
        to_date: i64,
    ) -> Result<Value, Error> {
        self.get_query("/nodeinfobulk", device_range(device_id, from_date, to_date))
            .await
    }

    pub async fn device_uploads(
        &self,
        device_id: &str,
        from_date: i64,
        to_date: i64,
    ) -> Result<Value, Error> {
        self.get_query(
            "/anthilluploadbulk",
            device_range(device_id, from_date, to_date),
        )
        .await
    }

    pub async fn last_production_devices(
        &self,
        device_id: Option<&str>,
        skip: u64,
        limit: u64,
    ) -> Result<Value, Error> {
        let query = Params::new()
            .with("skip", skip)
            .with("limit", limit)
            .with("device_id", device_id);
        self.get_query("/productionevents", query).await
    }

    pub async fn search_devices(&self, search_string: &str) -> Result<Value, Error> {
        self.get_query(
            "/devicesearch",
            Params::new().with("search_string", search_string),
        )
        .await
    }

    pub async fn move_device(&self, device_id: &str, organisation_id: &str) -> Result<Value, Error> {
        let body = Params::new()
            .with("organisation_id", organisation_id)
            .with("device_id", device_id);
        self.client()
            .post("/organisation/move_device", v1().json(body))
            .await
    }

    pub async fn deactivate_device(
        &self,
        device_id: &str,
        activation_code: &str,
    ) -> Result<Value, Error> {
        let body = Params::new()
            .with("device_id", device_id)
            .with("activation_code", activation_code);
        self.client()
            .post("/organisation/deactivate_device", v1().json(body))
            .await
    }

    pub async fn set_device_defect(
        &self,
        device_id: &str,
        defect_date: DateTime<Utc>,
        defect_info: &str,
    ) -> Result<Value, Error> {
        let body = Params::new()
            .with("defect_date", defect_date.to_rfc3339())
            .with("defect_info", defect_info);
        self.client()
            .put(&format!("/devices/{device_id}/defect"), v1().json(body))
            .await
    }
}

fn device_range(device_id: &str, from_date: i64, to_date: i64) -> Params {
    Params::new()
        .with("device_id", device_id)
        .with("from_date", from_date)
        .with("to_date", to_date)
}
