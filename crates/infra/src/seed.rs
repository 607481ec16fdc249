//! Seeding: load product inputs from a JSON file and replace the collection.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::instrument;

use catalog_core::DomainError;
use catalog_products::{Product, ProductInput};

use crate::store::{ProductStore, StoreError, ensure_unique_codes};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("seed data is not a JSON array of products: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid product at index {index}: {source}")]
    Invalid {
        index: usize,
        #[source]
        source: DomainError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Parse and validate a JSON array of product inputs.
pub fn parse_products(json: &str) -> Result<Vec<Product>, SeedError> {
    let inputs: Vec<ProductInput> = serde_json::from_str(json)?;
    let products = inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| {
            Product::create(input).map_err(|source| SeedError::Invalid { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;
    ensure_unique_codes(&products)?;
    Ok(products)
}

pub fn load_seed_file(path: &Path) -> Result<Vec<Product>, SeedError> {
    let json = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_products(&json)
}

/// Delete every stored product and insert the file's products.
#[instrument(skip_all, fields(path = %path.display()), err)]
pub async fn seed_store(store: &dyn ProductStore, path: &Path) -> Result<usize, SeedError> {
    let products = load_seed_file(path)?;
    let inserted = store.replace_all(products).await?;
    tracing::info!(inserted, "catalog seeded");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ProductFilter;
    use crate::store::InMemoryProductStore;
    use crate::test_support::input;

    fn to_json(inputs: &[ProductInput]) -> String {
        serde_json::to_string(inputs).unwrap()
    }

    #[test]
    fn parses_valid_products_in_order() {
        let json = to_json(&[input("A1", "First"), input("B2", "Second")]);
        let products = parse_products(&json).unwrap();
        let codes: Vec<_> = products.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes, vec!["A1", "B2"]);
        assert_ne!(products[0].id, products[1].id);
    }

    #[test]
    fn reports_index_of_invalid_product() {
        let mut bad = input("B2", "Second");
        bad.name = "  ".into();
        let json = to_json(&[input("A1", "First"), bad]);

        match parse_products(&json) {
            Err(SeedError::Invalid { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected invalid product error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_codes() {
        let json = to_json(&[input("A1", "First"), input("A1", "Again")]);
        assert!(matches!(
            parse_products(&json),
            Err(SeedError::Store(StoreError::DuplicateCode(code))) if code == "A1"
        ));
    }

    #[test]
    fn rejects_unknown_energy_class() {
        let json = to_json(&[input("A1", "First")]).replace("\"B\"", "\"Z\"");
        assert!(matches!(parse_products(&json), Err(SeedError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_seed_file(Path::new("/nonexistent/products.json")).unwrap_err();
        assert!(matches!(err, SeedError::Io { .. }));
    }

    #[tokio::test]
    async fn seed_store_replaces_existing_products() {
        let dir = std::env::temp_dir().join(format!("catalog-seed-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("products.json");
        std::fs::write(&path, to_json(&[input("N1", "New"), input("N2", "Newer")])).unwrap();

        let store = InMemoryProductStore::with_products(vec![
            Product::create(input("OLD", "Old")).unwrap(),
        ])
        .unwrap();

        let inserted = seed_store(&store, &path).await.unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(store.count(&ProductFilter::default()).await.unwrap(), 2);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn bundled_sample_data_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/products.json");
        let products = load_seed_file(&path).unwrap();
        assert!(!products.is_empty());
    }
}
