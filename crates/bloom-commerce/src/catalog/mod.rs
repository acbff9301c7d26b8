//! Product catalog module.
//!
//! Contains product types, their API wire form, and shop filters.

mod filter;
mod product;

pub use filter::ProductFilter;
pub use product::{FlowerCategory, Product, ProductRecord, WirePrice};
