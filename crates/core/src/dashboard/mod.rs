//! Dashboard headline stats and activity feed.
//!
//! - [`DashboardStats`]: the counters card, with a fixed fallback snapshot
//!   and a lenient transform from upstream JSON
//! - [`ActivityFeed`]: bounded, newest-first recent activity list
//! - [`quick_stats`]: static headline tiles

mod activity;
mod stats;

pub use activity::{
    ActivityFeed, ActivityKind, QuickStat, RecentActivity, Trend, quick_stats, relative_time,
};
pub use stats::DashboardStats;
