//! HTTP API application wiring (Axum router + layers).
//!
//! - `routes/`: handlers, one file per area
//! - `dto.rs`: response envelopes
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};

use catalog_infra::config::CatalogConfig;
use catalog_infra::listing::ProductCatalog;
use catalog_infra::store::ProductStore;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(store: Arc<dyn ProductStore>, config: &CatalogConfig) -> Router {
    let catalog = ProductCatalog::new(store);

    Router::new()
        .merge(routes::health_router())
        .nest("/api", routes::router())
        .fallback(routes::system::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer(config.cors_origin.as_deref()))
                .layer(Extension(catalog)),
        )
}

/// CORS for browser storefronts: `GET`/`OPTIONS` from `origin`, or any origin.
pub fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let allow_origin = match origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => AllowOrigin::exact(value),
        Some(Err(e)) => {
            tracing::warn!("Invalid CORS_ORIGIN value: {e}, allowing any origin");
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(allow_origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use catalog_infra::query::{ProductFilter, ProductQuery};
    use catalog_infra::store::{InMemoryProductStore, StoreError};
    use catalog_products::Product;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    /// Store that fails every read with a fixed error.
    struct FailingStore(StoreError);

    #[async_trait::async_trait]
    impl ProductStore for FailingStore {
        async fn count(&self, _filter: &ProductFilter) -> Result<u64, StoreError> {
            Err(self.0.clone())
        }

        async fn find(&self, _query: &ProductQuery) -> Result<Vec<Product>, StoreError> {
            Err(self.0.clone())
        }

        async fn replace_all(&self, _products: Vec<Product>) -> Result<usize, StoreError> {
            Err(self.0.clone())
        }
    }

    async fn list_with(err: StoreError) -> (StatusCode, Value) {
        let app = build_app(Arc::new(FailingStore(err)), &CatalogConfig::default());
        let res = app
            .oneshot(Request::get("/api/products?capacity=8").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn app(origin: Option<&str>) -> Router {
        let config = CatalogConfig {
            cors_origin: origin.map(str::to_string),
            ..CatalogConfig::default()
        };
        build_app(Arc::new(InMemoryProductStore::new()), &config)
    }

    #[tokio::test]
    async fn health_is_ok() {
        let res = app(None)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let res = app(None)
            .oneshot(Request::get("/api/orders").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn wrong_method_on_listing_is_404() {
        let res = app(None)
            .oneshot(Request::post("/api/products").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cors_echoes_configured_origin() {
        let res = app(Some("http://localhost:3000"))
            .oneshot(
                Request::get("/api/products")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
    }

    #[tokio::test]
    async fn cors_allows_any_origin_by_default() {
        let res = app(None)
            .oneshot(
                Request::get("/health")
                    .header(header::ORIGIN, "http://shop.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    }

    #[tokio::test]
    async fn type_mismatch_is_400_without_message() {
        let (status, body) =
            list_with(StoreError::type_mismatch("capacity", "invalid input syntax")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "success": false, "error": "Invalid query parameter: capacity" })
        );
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn backend_failure_is_500_with_message() {
        let (status, body) = list_with(StoreError::backend("connection reset")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": "Server Error",
                "message": "store backend error: connection reset",
            })
        );
    }
}
