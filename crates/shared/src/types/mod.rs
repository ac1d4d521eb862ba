//! Common types shared across crates.

pub mod id;
pub mod pagination;

pub use id::{AccountId, JournalId};
pub use pagination::{PageMeta, PageRequest, PageResponse};
