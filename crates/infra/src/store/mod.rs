//! Product document storage.
//!
//! The listing path needs exactly three operations from a store: count the
//! documents matching a filter, fetch one sorted page of them, and replace the
//! whole collection (seeding). Stores own their concurrency control; nothing
//! above this layer caches documents between requests.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use catalog_products::Product;

use crate::config::StoreBackend;
use crate::query::{ProductFilter, ProductQuery};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A filter or sort value could not be compared against the stored field type.
    #[error("type mismatch on {path}: {message}")]
    TypeMismatch { path: String, message: String },

    /// Two documents in one batch (or in the collection) share a `code`.
    #[error("duplicate product code: {0}")]
    DuplicateCode(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn type_mismatch(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Async product collection.
#[async_trait::async_trait]
pub trait ProductStore: Send + Sync {
    /// Number of documents matching `filter` (pagination ignored).
    async fn count(&self, filter: &ProductFilter) -> Result<u64, StoreError>;

    /// Matching documents, sorted by `query.sort`, then skipped and limited.
    async fn find(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError>;

    /// Delete every document and insert `products`. Returns the inserted count.
    async fn replace_all(&self, products: Vec<Product>) -> Result<usize, StoreError>;
}

#[async_trait::async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn count(&self, filter: &ProductFilter) -> Result<u64, StoreError> {
        (**self).count(filter).await
    }

    async fn find(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError> {
        (**self).find(query).await
    }

    async fn replace_all(&self, products: Vec<Product>) -> Result<usize, StoreError> {
        (**self).replace_all(products).await
    }
}

/// Reject a batch in which two products share a `code`.
pub fn ensure_unique_codes(products: &[Product]) -> Result<(), StoreError> {
    let mut seen = HashSet::with_capacity(products.len());
    for product in products {
        if !seen.insert(product.code.as_str()) {
            return Err(StoreError::DuplicateCode(product.code.clone()));
        }
    }
    Ok(())
}

/// Open the store selected by configuration.
pub async fn connect(backend: &StoreBackend) -> Result<Arc<dyn ProductStore>, StoreError> {
    match backend {
        StoreBackend::Memory => {
            tracing::info!("using in-memory product store");
            Ok(Arc::new(InMemoryProductStore::new()))
        }
        StoreBackend::Postgres { database_url } => {
            tracing::info!("using postgres product store");
            let store = PostgresProductStore::connect(database_url).await?;
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
    }
}
