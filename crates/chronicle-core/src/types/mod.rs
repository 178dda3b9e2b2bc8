//! Core types for chronicle.

mod entry;
mod page;

pub use entry::*;
pub use page::*;
