//! In-memory product store for tests/dev.

use std::sync::RwLock;

use regex::{Regex, RegexBuilder};
use tracing::instrument;

use catalog_products::Product;

use super::{ProductStore, StoreError, ensure_unique_codes};
use crate::query::{ProductFilter, ProductQuery};

/// Document collection kept in insertion order behind a `RwLock`.
///
/// Sorting is stable, so fully tied documents come back in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    inner: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Result<Self, StoreError> {
        ensure_unique_codes(&products)?;
        Ok(Self {
            inner: RwLock::new(products),
        })
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Product>>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::backend("product collection lock poisoned"))
    }
}

/// Filter with its text patterns compiled once per request.
struct CompiledFilter<'a> {
    filter: &'a ProductFilter,
    code: Option<Regex>,
    features: Vec<Regex>,
}

impl<'a> CompiledFilter<'a> {
    fn compile(filter: &'a ProductFilter) -> Result<Self, StoreError> {
        let code = filter
            .code
            .as_deref()
            .map(|code| case_insensitive(&regex::escape(code), "code"))
            .transpose()?;
        let features = filter
            .features
            .iter()
            .map(|f| case_insensitive(&format!(r"^{}\W*$", regex::escape(f)), "features"))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            filter,
            code,
            features,
        })
    }

    fn matches(&self, product: &Product) -> bool {
        if let Some(code) = &self.code {
            if !code.is_match(&product.code) {
                return false;
            }
        }
        if let Some(classes) = &self.filter.energy_classes {
            if !classes.iter().any(|c| c == product.energy_class.as_str()) {
                return false;
            }
        }
        if let Some(capacities) = &self.filter.capacities {
            if !capacities.contains(&product.capacity) {
                return false;
            }
        }
        self.features
            .iter()
            .all(|re| product.features.iter().any(|f| re.is_match(f)))
    }
}

fn case_insensitive(pattern: &str, path: &str) -> Result<Regex, StoreError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| StoreError::type_mismatch(path, e.to_string()))
}

#[async_trait::async_trait]
impl ProductStore for InMemoryProductStore {
    #[instrument(skip_all, fields(predicates = filter.len()), err)]
    async fn count(&self, filter: &ProductFilter) -> Result<u64, StoreError> {
        let compiled = CompiledFilter::compile(filter)?;
        let products = self.read()?;
        Ok(products.iter().filter(|p| compiled.matches(p)).count() as u64)
    }

    #[instrument(skip_all, fields(page = query.page, limit = query.limit), err)]
    async fn find(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError> {
        let compiled = CompiledFilter::compile(&query.filter)?;
        let products = self.read()?;

        let mut matched: Vec<&Product> = products.iter().filter(|p| compiled.matches(p)).collect();
        matched.sort_by(|a, b| {
            query
                .sort
                .iter()
                .map(|key| key.compare(a, b))
                .find(|ord| ord.is_ne())
                .unwrap_or(core::cmp::Ordering::Equal)
        });

        let skip = usize::try_from(query.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        Ok(matched.into_iter().skip(skip).take(limit).cloned().collect())
    }

    #[instrument(skip_all, fields(count = products.len()), err)]
    async fn replace_all(&self, products: Vec<Product>) -> Result<usize, StoreError> {
        ensure_unique_codes(&products)?;
        let mut guard = self
            .inner
            .write()
            .map_err(|_| StoreError::backend("product collection lock poisoned"))?;
        *guard = products;
        Ok(guard.len())
    }
}
