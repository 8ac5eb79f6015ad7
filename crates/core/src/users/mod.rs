//! App users and their subscriptions.

pub mod analytics;
mod filter;
mod types;

pub use filter::UserFilter;
pub use types::{NewUser, SubscriptionStatus, SubscriptionTier, User};
