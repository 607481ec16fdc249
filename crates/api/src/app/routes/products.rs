use axum::{
    Json, Router,
    extract::{Extension, Query},
    routing::get,
};
use tracing::instrument;

use catalog_infra::listing::ProductCatalog;
use catalog_infra::query::{ProductQuery, ProductQueryParams};

use crate::app::dto::ListingResponse;
use crate::app::errors::ApiError;
use crate::app::routes::system;

/// Listing routes, served with and without a trailing slash.
pub fn router() -> Router {
    let listing = || get(list_products).fallback(system::not_found);
    Router::new()
        .route("/products", listing())
        .route("/products/", listing())
}

/// `GET /api/products`: filtered, sorted, paginated listing.
#[instrument(skip_all, err(Display))]
pub async fn list_products(
    Extension(catalog): Extension<ProductCatalog>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ListingResponse>, ApiError> {
    let params = ProductQueryParams::from_pairs(pairs);
    let query = ProductQuery::from_params(&params);
    let page = catalog.list(&query).await?;
    Ok(Json(page.into()))
}
