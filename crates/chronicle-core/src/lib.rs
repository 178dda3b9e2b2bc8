//! chronicle-core - Core library for chronicle.
//!
//! This crate provides the changelog data model, the SQLite-backed store,
//! and the public and admin access surfaces built on top of it.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use chronicle_core::{AdminSurface, ChangelogFields, PublicSurface, SqliteChangelogStore};
//!
//! let store = Arc::new(SqliteChangelogStore::in_memory()?);
//! let admin = AdminSurface::new(store.clone());
//! let public = PublicSurface::new(store);
//!
//! admin.create(
//!     ChangelogFields::new()
//!         .with_title("Release")
//!         .with_content("- fix bug")
//!         .with_version("1.0.1"),
//! )?;
//!
//! let page = public.list_page(1)?;
//! ```

pub mod config;
pub mod error;
pub mod seed;
pub mod store;
pub mod surface;
pub mod types;

// Re-export commonly used types
pub use config::ChronicleConfig;
pub use error::{ChronicleError, ChronicleResult, ErrorCode, FieldErrors};
pub use seed::seed_defaults;
pub use store::{ChangelogStore, SqliteChangelogStore};
pub use surface::{
    AdminOutcome, AdminSurface, FormView, LoadedEntry, Notice, NoticeKind, PublicSurface,
    DEFAULT_PAGE_SIZE,
};
pub use types::{ChangelogDraft, ChangelogEntry, ChangelogFields, Page};
