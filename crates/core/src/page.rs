//! Pagination window and envelope types.
//!
//! Every list endpoint shares the same envelope shape:
//! `{ data: [...], page: { next, limit, previous } }`. The `next`/`previous`
//! cursors are plain window arithmetic over the *requested* offset — they are
//! not validated against whether more data actually exists; callers probe the
//! next window to find out.

use serde::Serialize;

use crate::error::{DomainError, DomainResult};

/// Default page size when the caller does not pass `limit`.
pub const DEFAULT_LIMIT: u64 = 10;

/// Requested pagination window (`limit` documents starting at `offset`).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u64,
    pub offset: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl PageRequest {
    pub fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }

    /// Reject windows the API contract forbids (`limit` must be >= 1).
    ///
    /// `offset` is unsigned, so negative offsets are unrepresentable and
    /// rejected earlier at deserialization.
    pub fn validate(&self) -> DomainResult<()> {
        if self.limit == 0 {
            return Err(DomainError::validation("limit must be >= 1"));
        }
        Ok(())
    }
}

/// Window bookkeeping returned alongside every page of results.
///
/// `limit` here is the number of documents actually returned, not the
/// requested page size.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub next: u64,
    pub limit: u64,
    pub previous: u64,
}

/// A page of results plus its envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub page: PageInfo,
}

impl<T> Paginated<T> {
    /// Wrap an already-windowed result set in the pagination envelope.
    pub fn from_window(data: Vec<T>, window: PageRequest) -> Self {
        let page = PageInfo {
            next: window.offset.saturating_add(window.limit),
            limit: data.len() as u64,
            previous: window.offset.saturating_sub(window.limit),
        };
        Self { data, page }
    }
}
