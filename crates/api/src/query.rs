//! Query parameter types for API handlers.

use abinject_core::pagination::PageRequest;
use abinject_db::models::script::ScriptQuery;
use serde::Deserialize;

/// Query parameters for `GET /scripts` (`?search=&page=&pageSize=`).
///
/// Without any of them the endpoint returns the full list; with at least one
/// it returns a single page. The page size may be spelled `pageSize` or
/// `page_size`; when both are sent, `pageSize` wins.
#[derive(Debug, Default, Deserialize)]
pub struct ListScriptsParams {
    pub search: Option<String>,
    pub page: Option<i64>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<i64>,
    #[serde(rename = "page_size")]
    pub page_size_snake: Option<i64>,
}

impl ListScriptsParams {
    pub fn is_paginated(&self) -> bool {
        self.search.is_some() || self.page.is_some() || self.requested_page_size().is_some()
    }

    fn requested_page_size(&self) -> Option<i64> {
        self.page_size.or(self.page_size_snake)
    }

    /// Normalized store query. The search term is kept verbatim.
    pub fn to_query(&self) -> ScriptQuery {
        ScriptQuery {
            search: self.search.clone().unwrap_or_default(),
            page: PageRequest::new(self.page, self.requested_page_size()),
        }
    }
}
