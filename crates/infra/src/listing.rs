//! Listing executor: one count plus one sorted page per request.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use catalog_products::Product;

use crate::query::ProductQuery;
use crate::store::{ProductStore, StoreError};

/// One page of a product listing with its pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingPage {
    /// Items on this page.
    pub count: usize,
    /// Items matching the filter across all pages.
    pub total: u64,
    pub page: u64,
    pub pages: u64,
    pub data: Vec<Product>,
}

/// Runs listing queries against a product store.
///
/// Count and page are two independent reads; concurrent seeding can leave
/// `total` slightly out of step with `data`.
#[derive(Clone)]
pub struct ProductCatalog {
    store: Arc<dyn ProductStore>,
}

impl ProductCatalog {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    #[instrument(skip_all, fields(page = query.page, limit = query.limit), err)]
    pub async fn list(&self, query: &ProductQuery) -> Result<ListingPage, StoreError> {
        tracing::debug!(
            predicates = query.filter.len(),
            sort_keys = query.sort.len(),
            "listing products"
        );

        let total = self.store.count(&query.filter).await?;
        let data = self.store.find(query).await?;

        Ok(ListingPage {
            count: data.len(),
            total,
            page: query.page,
            pages: total.div_ceil(query.limit),
            data,
        })
    }
}
