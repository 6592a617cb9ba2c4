use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{InternApi, v1};
use crate::error::Error;
use crate::pagination::DEFAULT_PAGE_LIMIT;
use crate::params::Params;

impl InternApi {
    pub async fn organisation(&self, organisation_id: &str) -> Result<Value, Error> {
        self.client()
            .get(
                "/organisation/by_id",
                v1().query(Params::new().with("organisation_id", organisation_id)),
            )
            .await
    }

    /// All organisations matching the filters, across every page.
    pub async fn query_organisations(
        &self,
        name_search_string: Option<&str>,
        partner_id: Option<&str>,
        active_test_package: Option<bool>,
    ) -> Result<Vec<Value>, Error> {
        let query = Params::new()
            .with("name_search_string", name_search_string)
            .with("limit", DEFAULT_PAGE_LIMIT)
            .with("offset", 0)
            .with("partner_id", partner_id)
            .with("active_test_package", active_test_package);
        self.client()
            .get_paginated("/organisation/list", v1().query(query))
            .await
    }

    pub async fn update_organisation_partner(
        &self,
        organisation_id: &str,
        partner_id: &str,
    ) -> Result<Value, Error> {
        let body = Params::new()
            .with("organisation_id", organisation_id)
            .with("partner_id", partner_id);
        self.client()
            .post("/organisation/partner_id", v1().json(body))
            .await
    }

    pub async fn update_organisation_infos(
        &self,
        organisation_id: &str,
        partner_id: Option<&str>,
        service_model_mode: Option<&str>,
    ) -> Result<Value, Error> {
        let body = Params::new()
            .with("service_model_mode", service_model_mode)
            .with("partner_id", partner_id);
        self.client()
            .put(
                &format!("/organisation/{organisation_id}/internal_information"),
                v1().json(body),
            )
            .await
    }

    pub async fn activate_test_package(
        &self,
        organisation_id: &str,
        end_date: DateTime<Utc>,
    ) -> Result<Value, Error> {
        let body = Params::new().with("end_date", end_date.to_rfc3339());
        self.client()
            .put(
                &format!("/organisation/{organisation_id}/activate_test_package"),
                v1().json(body),
            )
            .await
    }

    pub async fn animals_by_organisation(&self, organisation_id: &str) -> Result<Value, Error> {
        self.get_query(
            "/animallist",
            Params::new().with("organisation_id", organisation_id),
        )
        .await
    }
}
