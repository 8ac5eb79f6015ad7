//! Common types used across the application.

pub mod id;
pub mod pagination;

pub use id::*;
pub use pagination::{PageRequest, PageSlot, total_pages, visible_pages};
