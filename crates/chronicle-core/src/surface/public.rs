//! Read-only access for any caller.

use std::sync::Arc;

use crate::error::ChronicleResult;
use crate::store::ChangelogStore;
use crate::types::{ChangelogEntry, Page};

use super::DEFAULT_PAGE_SIZE;

/// Public list and detail views over the store.
#[derive(Clone)]
pub struct PublicSurface {
    store: Arc<dyn ChangelogStore>,
    page_size: u32,
}

impl PublicSurface {
    pub fn new(store: Arc<dyn ChangelogStore>) -> Self {
        Self {
            store,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the listing page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// One page of entries, newest release first.
    pub fn list_page(&self, page_number: u32) -> ChronicleResult<Page<ChangelogEntry>> {
        super::list_page(self.store.as_ref(), page_number, self.page_size)
    }

    /// A single entry. A missing entry is reported as `NotFound`, not masked.
    pub fn show_detail(&self, id: i64) -> ChronicleResult<ChangelogEntry> {
        self.store.get(id)
    }
}
