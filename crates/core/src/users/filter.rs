//! Search and dropdown filters for the users table.

use serde::{Deserialize, Serialize};

use super::types::{SubscriptionStatus, SubscriptionTier, User};

/// Users table filter. `None` on a dropdown means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFilter {
    /// Case-insensitive substring of name or email.
    #[serde(default)]
    pub search: String,
    /// Plan tier.
    #[serde(default)]
    pub tier: Option<SubscriptionTier>,
    /// Billing state.
    #[serde(default)]
    pub status: Option<SubscriptionStatus>,
}

impl UserFilter {
    /// Returns true if `user` passes every criterion.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || user.name.to_lowercase().contains(&needle)
            || user.email.to_lowercase().contains(&needle);

        matches_search
            && self.tier.is_none_or(|t| user.subscription_type == t)
            && self.status.is_none_or(|s| user.subscription_status == s)
    }

    /// Users passing the filter, in input order.
    #[must_use]
    pub fn apply<'a>(&self, users: &'a [User]) -> Vec<&'a User> {
        users.iter().filter(|u| self.matches(u)).collect()
    }
}
