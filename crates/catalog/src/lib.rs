//! `storefront-catalog` — product documents and catalog filtering.

pub mod product;

pub use product::{NewProduct, ProductFilter, ProductRecord, ProductSummary, SizeVariant};
