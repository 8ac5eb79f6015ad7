//! Gift codes used for promotions.

mod service;
mod types;

pub(crate) use service::random_code;
pub use service::{GiftCodeBatch, GiftCodeFilter, GiftCodeStats, MAX_BATCH_QUANTITY};
pub use types::{GiftCode, GiftCodeKind, GiftCodeStatus};
