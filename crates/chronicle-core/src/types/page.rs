//! Pagination result type.

use serde::{Deserialize, Serialize};

/// One page of an ordered listing plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    /// 1-indexed.
    pub current_page: u32,
    pub per_page: u32,
    /// Zero when there are no items at all.
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Page<T> {
    /// Build a page from a store slice.
    pub fn new(items: Vec<T>, total_count: u64, current_page: u32, per_page: u32) -> Self {
        let current_page = current_page.max(1);
        let total_pages = if per_page == 0 {
            0
        } else {
            total_count.div_ceil(u64::from(per_page)) as u32
        };

        Self {
            items,
            total_count,
            current_page,
            per_page,
            total_pages,
            has_next: current_page < total_pages,
            has_prev: current_page > 1,
        }
    }
}
