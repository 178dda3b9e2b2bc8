//! Capability-scoped access to the changelog store.
//!
//! The public surface only reads; the admin surface also writes. Which one a
//! caller may reach is decided outside this crate.

mod admin;
pub mod notice;
mod public;

pub use admin::{AdminOutcome, AdminSurface, FormView, LoadedEntry};
pub use notice::{Notice, NoticeKind};
pub use public::PublicSurface;

use crate::error::ChronicleResult;
use crate::store::ChangelogStore;
use crate::types::{ChangelogEntry, Page};

/// Entries per listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

fn list_page(
    store: &dyn ChangelogStore,
    page_number: u32,
    page_size: u32,
) -> ChronicleResult<Page<ChangelogEntry>> {
    let page_number = page_number.max(1);
    let (items, total_count) = store.list_ordered(page_number, page_size)?;
    Ok(Page::new(items, total_count, page_number, page_size))
}
