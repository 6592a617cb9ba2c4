// Annotations and test sets.

use std::time::Duration;

use serde_json::Value;

use super::PublicApi;
use crate::client::RequestOptions;
use crate::error::Error;
use crate::pagination::DEFAULT_PAGE_LIMIT;
use crate::params::Params;

const TESTSET_TIMEOUT: Duration = Duration::from_secs(25);

/// Fields to change on an existing annotation. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct AnnotationUpdate {
    pub ts: Option<i64>,
    pub end_ts: Option<i64>,
    pub classes: Option<Value>,
    pub attributes: Option<Value>,
}

impl PublicApi {
    pub async fn annotation(&self, annotation_id: &str) -> Result<Value, Error> {
        self.get_with(
            "/annotation/id",
            Params::new().with("annotation_id", annotation_id),
        )
        .await
    }

    pub async fn animal_annotations(
        &self,
        animal_id: &str,
        from_date: i64,
        to_date: i64,
    ) -> Result<Vec<Value>, Error> {
        self.query_annotations(("animal_id", animal_id), from_date, to_date)
            .await
    }

    pub async fn annotations_by_class(
        &self,
        annotation_class: &str,
        from_date: i64,
        to_date: i64,
    ) -> Result<Vec<Value>, Error> {
        self.query_annotations(("annotation_class", annotation_class), from_date, to_date)
            .await
    }

    pub async fn organisation_annotations(
        &self,
        organisation_id: &str,
        from_date: i64,
        to_date: i64,
    ) -> Result<Vec<Value>, Error> {
        self.query_annotations(("organisation_id", organisation_id), from_date, to_date)
            .await
    }

    async fn query_annotations(
        &self,
        (filter_key, filter): (&str, &str),
        from_date: i64,
        to_date: i64,
    ) -> Result<Vec<Value>, Error> {
        let query = Params::new()
            .with("to_date", to_date)
            .with("from_date", from_date)
            .with("limit", DEFAULT_PAGE_LIMIT)
            .with("offset", 0)
            .with(filter_key, filter);
        self.client()
            .get_paginated("/annotation/query", RequestOptions::new().query(query))
            .await
    }

    pub async fn annotation_definition(&self) -> Result<Value, Error> {
        self.client()
            .get("/annotation/definition", RequestOptions::new())
            .await
    }

    pub async fn insert_animal_annotation(
        &self,
        animal_id: &str,
        ts: i64,
        end_ts: i64,
        classes: Option<Value>,
        attributes: Option<Value>,
    ) -> Result<Value, Error> {
        let body = Params::new()
            .with("animal_id", animal_id)
            .with("ts", ts)
            .with("end_ts", end_ts)
            .with("classes", classes)
            .with("attributes", attributes);
        self.client()
            .put("/annotation/animal", RequestOptions::new().json(body))
            .await
    }

    pub async fn update_annotation(
        &self,
        annotation_id: &str,
        update: AnnotationUpdate,
    ) -> Result<Value, Error> {
        let body = Params::new()
            .with("annotation_id", annotation_id)
            .with("ts", update.ts)
            .with("end_ts", update.end_ts)
            .with("classes", update.classes)
            .with("attributes", update.attributes);
        self.client()
            .post("/annotation/id", RequestOptions::new().json(body))
            .await
    }

    // ── Test sets ───────────────────────────────────────────────────

    pub async fn insert_testset(
        &self,
        name: &str,
        meta_data: Value,
        annotation_ids: &[&str],
    ) -> Result<Value, Error> {
        let body = Params::new()
            .with("name", name)
            .with("meta_data", meta_data)
            .with("annotation_ids", annotation_ids);
        self.client()
            .put(
                "/annotation/testset",
                RequestOptions::new().json(body).timeout(TESTSET_TIMEOUT),
            )
            .await
    }

    pub async fn update_testset(
        &self,
        testset_id: &str,
        annotation_ids: &[&str],
    ) -> Result<Value, Error> {
        let body = Params::new()
            .with("testset_id", testset_id)
            .with("annotation_ids", annotation_ids);
        self.client()
            .post("/annotation/testset", RequestOptions::new().json(body))
            .await
    }

    pub async fn testset(&self, testset_id: &str) -> Result<Value, Error> {
        self.get_with(
            "/annotation/testset",
            Params::new().with("testset_id", testset_id),
        )
        .await
    }

    pub async fn testset_by_name(&self, name: &str) -> Result<Value, Error> {
        self.get_with("/annotation/testset/by_name", Params::new().with("name", name))
            .await
    }
}
