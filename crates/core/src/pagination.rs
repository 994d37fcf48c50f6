//! Paging primitives shared by the list/search operations.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::errors::{Error, Result, ValidationError};

/// A caller's request for one page of results. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Builds a request from optional query values, applying defaults.
    pub fn from_params(page: Option<i64>, page_size: Option<i64>) -> Result<Self> {
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size <= 0 || page_size > MAX_PAGE_SIZE {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Page size must be between 1 and {}",
                MAX_PAGE_SIZE
            ))));
        }
        Ok(Self {
            page: page.unwrap_or(1).max(1),
            page_size,
        })
    }

    /// Resolves the request against a known row count.
    ///
    /// A page past the end is clamped to the last page, so a caller asking for
    /// page 9 of a 3 page result gets page 3.
    pub fn window(&self, total_row_count: i64) -> PageWindow {
        let page_size = self.page_size.max(1);
        let last_page = ((total_row_count + page_size - 1) / page_size).max(1);
        let page = self.page.clamp(1, last_page);
        PageWindow {
            page,
            last_page,
            offset: (page - 1) * page_size,
            limit: page_size,
        }
    }
}

/// The concrete slice a storage query should fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub last_page: i64,
    pub offset: i64,
    pub limit: i64,
}

/// One page of results together with paging metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total_row_count: i64,
    pub current_page: i64,
    pub last_page: i64,
    pub page_size: i64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total_row_count: i64, window: PageWindow) -> Self {
        Self {
            data,
            meta: PageMeta {
                total_row_count,
                current_page: window.page,
                last_page: window.last_page,
                page_size: window.limit,
            },
        }
    }

    /// Maps the items while keeping the paging metadata.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}
