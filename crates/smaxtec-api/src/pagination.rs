// Offset-cursor pagination
//
// List endpoints answer `{"data": [...], "pagination": {"next_offset": n}}`.
// A page shorter than the requested `limit` is the last one.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::client::{ApiClient, RequestOptions};
use crate::error::Error;

/// Page size used by the endpoint methods.
pub const DEFAULT_PAGE_LIMIT: u64 = 100;

/// One page of a list endpoint.
#[derive(Debug, Deserialize)]
pub struct Page {
    pub data: Vec<Value>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub next_offset: Option<Value>,
}

impl ApiClient {
    /// GET every page of `path` and return the concatenated `data` items.
    ///
    /// The query must carry a positive integer `limit`; `offset` is advanced
    /// to each page's `pagination.next_offset`. A page holding exactly
    /// `limit` items always triggers one more fetch.
    pub async fn get_paginated(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Vec<Value>, Error> {
        let mut options = options;
        let limit = options
            .query
            .as_ref()
            .and_then(|q| q.get("limit"))
            .and_then(Value::as_u64)
            .filter(|l| *l > 0)
            .ok_or_else(|| {
                Error::InvalidArgument(format!("{path}: pagination needs an integer limit > 0"))
            })?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        let mut items = Vec::new();
        loop {
            let value = self.get(path, options.clone()).await?;
            let page = Page::deserialize(&value).map_err(|e| Error::Deserialization {
                message: format!("{path}: not a page: {e}"),
                body: value.to_string(),
            })?;

            let count = page.data.len();
            items.extend(page.data);
            if count < limit {
                break;
            }

            let next_offset = page
                .pagination
                .and_then(|p| p.next_offset)
                .filter(|o| !o.is_null())
                .ok_or_else(|| Error::Deserialization {
                    message: format!("{path}: full page without pagination.next_offset"),
                    body: value.to_string(),
                })?;
            debug!(path, fetched = items.len(), "fetching next page");
            if let Some(query) = options.query.as_mut() {
                query.set("offset", next_offset);
            }
        }
        Ok(items)
    }
}
