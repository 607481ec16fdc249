//! Products domain module.
//!
//! This crate contains the catalog document model and its validation rules,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod product;

pub use product::{
    EnergyClass, FieldValue, Installment, Price, Product, ProductField, ProductInput,
};
