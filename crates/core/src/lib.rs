//! `storefront-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod page;

pub use error::{DomainError, DomainResult};
pub use id::{OrderId, ProductId};
pub use page::{PageInfo, PageRequest, Paginated};
