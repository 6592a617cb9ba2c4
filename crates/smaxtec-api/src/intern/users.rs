use serde_json::Value;

use super::{InternApi, v1};
use crate::error::Error;
use crate::pagination::DEFAULT_PAGE_LIMIT;
use crate::params::Params;

impl InternApi {
    pub async fn user(&self, user_id: &str) -> Result<Value, Error> {
        self.client()
            .get(
                "/user/by_id",
                v1().query(Params::new().with("user_id", user_id)),
            )
            .await
    }

    pub async fn query_users(&self, email_search_string: Option<&str>) -> Result<Vec<Value>, Error> {
        let query = Params::new()
            .with("email_search_string", email_search_string)
            .with("limit", DEFAULT_PAGE_LIMIT)
            .with("offset", 0);
        self.client()
            .get_paginated("/user/list", v1().query(query))
            .await
    }

    // ── Hidden shares ───────────────────────────────────────────────

    pub async fn hidden_shares(&self, user_id: &str) -> Result<Value, Error> {
        self.client()
            .get(
                "/user/hidden_shares_by_user",
                v1().query(Params::new().with("user_id", user_id)),
            )
            .await
    }

    pub async fn delete_hidden_share(&self, share_id: &str) -> Result<Value, Error> {
        self.client()
            .delete(
                "/user/hidden_share",
                v1().query(Params::new().with("share_id", share_id)),
            )
            .await
    }

    pub async fn create_hidden_share(
        &self,
        organisation_id: &str,
        user_id: &str,
    ) -> Result<Value, Error> {
        let body = Params::new()
            .with("organisation_id", organisation_id)
            .with("user_id", user_id);
        self.client()
            .put("/user/hidden_share", v1().json(body))
            .await
    }

    pub async fn activate_user(&self, email: &str) -> Result<Value, Error> {
        self.client()
            .put(
                "/user/activate",
                v1().json(Params::new().with("user_email", email)),
            )
            .await
    }
}
