use serde_json::Value;

use super::{InternApi, v1};
use crate::error::Error;
use crate::pagination::DEFAULT_PAGE_LIMIT;
use crate::params::Params;

/// Internal account fields to change. `None` fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct AccountInfo {
    pub partner_id: Option<String>,
    pub account_nr: Option<String>,
    pub owner_id: Option<String>,
    pub billing_emails: Option<Vec<String>>,
}

impl InternApi {
    pub async fn query_accounts(
        &self,
        name_search_string: Option<&str>,
        partner_id: Option<&str>,
    ) -> Result<Vec<Value>, Error> {
        let query = Params::new()
            .with("name_search_string", name_search_string)
            .with("limit", DEFAULT_PAGE_LIMIT)
            .with("offset", 0)
            .with("partner_id", partner_id);
        self.client()
            .get_paginated("/account/list", v1().query(query))
            .await
    }

    pub async fn account(&self, account_id: &str) -> Result<Value, Error> {
        self.client()
            .get(&format!("/account/{account_id}"), v1())
            .await
    }

    pub async fn partner_list(&self) -> Result<Value, Error> {
        self.client().get("/account/partner_list", v1()).await
    }

    pub async fn create_billing_report(&self, partner_id: &str) -> Result<Value, Error> {
        self.client()
            .get(&format!("/account/{partner_id}/billing_report"), v1())
            .await
    }

    pub async fn update_account_infos(
        &self,
        account_id: &str,
        info: AccountInfo,
    ) -> Result<Value, Error> {
        let body = Params::new()
            .with("partner_id", info.partner_id)
            .with("account_nr", info.account_nr)
            .with("owner_id", info.owner_id)
            .with("billing_emails", info.billing_emails);
        self.client()
            .put(
                &format!("/account/{account_id}/internal_information"),
                v1().json(body),
            )
            .await
    }
}
