//! Pagination helper.
//!
//! Page size is restricted to a fixed whitelist; invalid inputs silently
//! fall back to defaults, so this helper never fails.

use serde::{Deserialize, Serialize};

/// Page sizes the API will serve.
pub const ALLOWED_LIMITS: [i64; 5] = [10, 20, 30, 40, 50];

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Raw pagination query parameters from the client.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    /// Clamp to a valid window: page >= 1 (default 1), limit one of
    /// [`ALLOWED_LIMITS`] (default 10).
    pub fn clamp(self) -> PageWindow {
        let page = match self.page {
            Some(p) if p >= 1 => p,
            _ => DEFAULT_PAGE,
        };
        let limit = match self.limit {
            Some(l) if ALLOWED_LIMITS.contains(&l) => l,
            _ => DEFAULT_LIMIT,
        };
        PageWindow { page, limit }
    }
}

/// A validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub limit: i64,
}

impl PageWindow {
    /// Number of records to skip. Saturates for huge page numbers rather
    /// than overflowing; such a page is past the data either way.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Pagination metadata returned with every list response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(window: PageWindow, total: i64) -> Self {
        let PageWindow { page, limit } = window;
        Self {
            page,
            limit,
            total,
            total_pages: total.saturating_add(limit - 1) / limit,
            has_next: page.saturating_mul(limit) < total,
            has_prev: page > 1,
        }
    }
}

/// A page of records plus pagination metadata.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, window: PageWindow, total: i64) -> Self {
        Self {
            data,
            pagination: Pagination::new(window, total),
        }
    }
}
