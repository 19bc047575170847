//! `storefront-infra` — document store boundary and implementations.

pub mod store;

pub use store::{DocumentStore, InMemoryStore, PostgresStore, StoreError};
