//! Pagination
//!
//! Page metadata is derived from a full count query plus one windowed
//! fetch: a single `LIMIT ... START ...` query per page, never a re-scan
//! of the preceding pages. `offset` is a zero-based page index, not a row
//! offset.

use serde::{Deserialize, Serialize};

/// Page request: `limit` rows per page, `offset` = page index (0-based)
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

const DEFAULT_LIMIT: usize = 10;

impl PageRequest {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Effective limit, never zero
    pub fn limit(&self) -> usize {
        self.limit.max(1)
    }

    /// Row offset of the window start
    pub fn start(&self) -> usize {
        self.limit() * self.offset
    }
}

/// One page of documents plus metadata
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub docs: Vec<T>,
    pub total_docs: usize,
    pub limit: usize,
    pub total_pages: usize,
    /// 1-based page number
    pub current_page: usize,
    pub has_prev_page: bool,
    pub has_next_page: bool,
}

impl<T> Page<T> {
    /// Assemble a page from the fetched window and the total count
    pub fn assemble(docs: Vec<T>, total_docs: usize, request: PageRequest) -> Self {
        let limit = request.limit();
        let total_pages = total_docs.div_ceil(limit);
        let current_page = request.offset + 1;
        Self {
            docs,
            total_docs,
            limit,
            total_pages,
            current_page,
            has_prev_page: request.offset > 0,
            has_next_page: current_page < total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            docs: self.docs.into_iter().map(f).collect(),
            total_docs: self.total_docs,
            limit: self.limit,
            total_pages: self.total_pages,
            current_page: self.current_page,
            has_prev_page: self.has_prev_page,
            has_next_page: self.has_next_page,
        }
    }
}
