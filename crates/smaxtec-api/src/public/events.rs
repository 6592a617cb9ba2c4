use serde_json::Value;

use super::PublicApi;
use crate::client::RequestOptions;
use crate::error::Error;
use crate::pagination::DEFAULT_PAGE_LIMIT;
use crate::params::Params;

impl PublicApi {
    /// Events of an animal, starting at `offset`, fetched `limit` at a time
    /// until the last page.
    pub async fn animal_events(
        &self,
        animal_id: &str,
        from_date: Option<i64>,
        to_date: Option<i64>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Value>, Error> {
        let query = Params::new()
            .with("animal_id", animal_id)
            .with("limit", limit)
            .with("offset", offset)
            .with("from_date", from_date)
            .with("to_date", to_date);
        self.client()
            .get_paginated("/event/query", RequestOptions::new().query(query))
            .await
    }

    pub async fn device_events(
        &self,
        device_id: &str,
        from_date: Option<i64>,
        to_date: Option<i64>,
    ) -> Result<Vec<Value>, Error> {
        let query = Params::new()
            .with("device_id", device_id)
            .with("limit", DEFAULT_PAGE_LIMIT)
            .with("offset", 0)
            .with("from_date", from_date)
            .with("to_date", to_date);
        self.client()
            .get_paginated("/event/query", RequestOptions::new().query(query))
            .await
    }

    /// Events of a whole organisation, optionally restricted to
    /// `categories`.
    pub async fn organisation_events(
        &self,
        organisation_id: &str,
        from_date: i64,
        to_date: i64,
        categories: Option<&[&str]>,
    ) -> Result<Vec<Value>, Error> {
        let query = Params::new()
            .with("organisation_id", organisation_id)
            .with("offset", 0)
            .with("limit", DEFAULT_PAGE_LIMIT)
            .with("from_date", from_date)
            .with("to_date", to_date)
            .with("categories", categories);
        self.client()
            .get_paginated("/event/by_organisation", RequestOptions::new().query(query))
            .await
    }
}
