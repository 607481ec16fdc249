//! Infrastructure layer: query parsing, product stores, listing, config and seeding.

pub mod config;
pub mod listing;
pub mod query;
pub mod seed;
pub mod store;

#[cfg(test)]
mod test_support;
