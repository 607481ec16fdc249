//! `catalog-storefront`
//!
//! Client-side state for browsing the catalog:
//! - facet/search filter state and its mapping to request parameters
//! - incremental "load more" paging with stale-response protection
//! - a cart keyed by product code
//! - an HTTP client for `GET /api/products`

pub mod cart;
pub mod client;
pub mod debounce;
pub mod filters;
pub mod format;
pub mod pager;
pub mod storefront;
pub mod types;

pub use cart::Cart;
pub use client::{ClientError, StorefrontClient};
pub use debounce::Debouncer;
pub use filters::{FilterState, SortOption};
pub use format::{FormattedPrice, format_price};
pub use pager::{PageTicket, Pager};
pub use storefront::Storefront;
pub use types::{ListingPage, ProductsRequest};
