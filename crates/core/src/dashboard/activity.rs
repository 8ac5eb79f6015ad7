//! Recent activity feed and headline tiles.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::users::User;

/// Severity tag of an activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// Something completed.
    Success,
    /// Something needs attention.
    Warning,
    /// Neutral event.
    Info,
    /// Revenue event.
    Premium,
}

impl ActivityKind {
    /// CSS class of the activity icon.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "activity-success",
            Self::Warning => "activity-warning",
            Self::Info => "activity-info",
            Self::Premium => "activity-premium",
        }
    }
}

/// One entry in the recent activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentActivity {
    /// Entry ID.
    pub id: String,
    /// Who did it.
    pub user: String,
    /// What happened.
    pub action: String,
    /// Relative time such as `2 mins ago`.
    pub timestamp: String,
    /// Icon glyph.
    pub icon: String,
    /// Severity tag.
    #[serde(rename = "type")]
    pub kind: ActivityKind,
}

impl RecentActivity {
    /// Creates an entry.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        user: impl Into<String>,
        action: impl Into<String>,
        timestamp: impl Into<String>,
        icon: impl Into<String>,
        kind: ActivityKind,
    ) -> Self {
        Self {
            id: id.into(),
            user: user.into(),
            action: action.into(),
            timestamp: timestamp.into(),
            icon: icon.into(),
            kind,
        }
    }
}

impl RecentActivity {
    /// A "joined" entry for a newly registered user.
    #[must_use]
    pub fn joined(user: &User, now: DateTime<Utc>) -> Self {
        Self::new(
            format!("user-{}", user.id),
            user.name.clone(),
            format!("Joined on the {} plan", user.subscription_type.display_name()),
            relative_time(user.created_at, now),
            "🆕",
            ActivityKind::Success,
        )
    }
}

/// `Just now`, `5 mins ago`, `1 hour ago`, `3 days ago`. Future times read
/// as `Just now`.
#[must_use]
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let (count, unit) = match elapsed.num_minutes() {
        m if m < 1 => return "Just now".to_string(),
        m if m < 60 => (m, "min"),
        _ if elapsed.num_hours() < 24 => (elapsed.num_hours(), "hour"),
        _ => (elapsed.num_days(), "day"),
    };
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} {unit}{plural} ago")
}

/// Newest-first activity list holding at most [`ActivityFeed::CAPACITY`]
/// entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityFeed {
    entries: VecDeque<RecentActivity>,
}

impl ActivityFeed {
    /// Maximum number of entries kept.
    pub const CAPACITY: usize = 8;

    /// An empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The static feed shown next to the stats card.
    #[must_use]
    pub fn canned() -> Self {
        use ActivityKind::{Info, Premium, Success, Warning};
        let rows = [
            ("1", "John Legend", "Upgraded to Enterprise Plan", "2 mins ago", "💎", Premium),
            ("2", "Sarah Chen", "Completed 8h Sleep Session", "5 mins ago", "💤", Success),
            ("3", "Mike Rodriguez", "Created Custom Sound Mix", "12 mins ago", "🎵", Info),
            ("4", "Emma Wilson", "Redeemed Premium Gift Code", "25 mins ago", "🎁", Premium),
            ("5", "Alex Thompson", "Downloaded Sleep Report", "1 hour ago", "📊", Info),
            ("6", "Lisa Garcia", "Subscription Payment Failed", "2 hours ago", "⚠️", Warning),
            ("7", "David Park", "Started 7-Day Free Trial", "3 hours ago", "🎯", Success),
            ("8", "Maria Johnson", "Completed AI Sleep Analysis", "4 hours ago", "🧠", Info),
        ];
        Self {
            entries: rows
                .into_iter()
                .map(|(id, user, action, ts, icon, kind)| {
                    RecentActivity::new(id, user, action, ts, icon, kind)
                })
                .collect(),
        }
    }

    /// Adds an entry at the front, dropping the oldest beyond capacity.
    pub fn push(&mut self, activity: RecentActivity) {
        self.entries.push_front(activity);
        self.entries.truncate(Self::CAPACITY);
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &RecentActivity> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the feed has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Direction of a headline tile's change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Improving.
    Up,
    /// Worsening.
    Down,
}

impl Trend {
    /// Arrow glyph.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Up => "📈",
            Self::Down => "📉",
        }
    }

    /// Hex color of the change label.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Up => "#10b981",
            Self::Down => "#ef4444",
        }
    }
}

/// A headline tile such as "Daily Active Users".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickStat {
    /// Tile title.
    pub title: &'static str,
    /// Formatted value.
    pub value: &'static str,
    /// Formatted change, such as `+12%`.
    pub change: &'static str,
    /// Change direction.
    pub trend: Trend,
    /// Icon glyph.
    pub icon: &'static str,
    /// Accent color name.
    pub color: &'static str,
}

/// The four static headline tiles.
#[must_use]
pub fn quick_stats() -> [QuickStat; 4] {
    let tile = |title, value, change, icon, color| QuickStat {
        title,
        value,
        change,
        trend: Trend::Up,
        icon,
        color,
    };
    [
        tile("Daily Active Users", "1,247", "+12%", "👥", "blue"),
        tile("Session Duration", "7.2h", "+8%", "⏱️", "green"),
        tile("Sleep Quality", "86%", "+5%", "⭐", "purple"),
        tile("App Store Rating", "4.9/5", "+0.2", "📱", "orange"),
    ]
}
