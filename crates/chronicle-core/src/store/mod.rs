//! Persistence for changelog entries.

mod changelog_store;

pub use changelog_store::{ChangelogStore, SqliteChangelogStore};

#[cfg(test)]
pub use changelog_store::MockChangelogStore;
