use serde_json::{Map, Value};

use super::InternApi;
use crate::client::RequestOptions;
use crate::error::Error;
use crate::params::Params;

/// An event to insert for a device.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub device_id: String,
    pub event_type: String,
    pub timestamp: i64,
    /// Stored as `metadata.value`.
    pub value: Value,
    pub metadata: Map<String, Value>,
    pub level: i64,
    pub disable_notifications: bool,
}

impl NewEvent {
    pub fn new(
        device_id: impl Into<String>,
        event_type: impl Into<String>,
        timestamp: i64,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            event_type: event_type.into(),
            timestamp,
            value: value.into(),
            metadata: Map::new(),
            level: 10,
            disable_notifications: false,
        }
    }
}

impl InternApi {
    pub async fn insert_event(&self, event: NewEvent) -> Result<Value, Error> {
        let NewEvent {
            device_id,
            event_type,
            timestamp,
            value,
            mut metadata,
            level,
            disable_notifications,
        } = event;
        metadata.insert("value".into(), value);

        let body = Params::new()
            .with("device_id", device_id)
            .with("metadata", metadata)
            .with("event_type", event_type)
            .with("level", level)
            .with("timestamp", timestamp)
            .with("disable_hooks", u8::from(disable_notifications));
        self.client()
            .put("/event", RequestOptions::new().json(body))
            .await
    }

    pub async fn update_event_meta(
        &self,
        event_id: &str,
        metadata: Map<String, Value>,
    ) -> Result<Value, Error> {
        let body = Params::new()
            .with("event_id", event_id)
            .with("metadata", metadata);
        self.client()
            .post("/event", RequestOptions::new().json(body))
            .await
    }

    pub async fn last_event_timestamps(&self, device_id: &str) -> Result<Value, Error> {
        self.get_query(
            "/lasteventtimestamps",
            Params::new().with("device_id", device_id),
        )
        .await
    }

    pub async fn delete_event(&self, event_id: &str) -> Result<Value, Error> {
        self.client()
            .delete(
                "/event",
                RequestOptions::new().query(Params::new().with("event_id", event_id)),
            )
            .await
    }
}
