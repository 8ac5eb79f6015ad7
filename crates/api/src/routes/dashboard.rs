//! Dashboard routes.

use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;
use serde::Serialize;
use sleepdash_core::dashboard::{
    ActivityFeed, DashboardStats, QuickStat, RecentActivity, quick_stats,
};
use tracing::debug;

use crate::{AppState, middleware::AuthAdmin};

/// Newest signups merged into the activity feed.
const SIGNUPS_IN_FEED: usize = 3;

/// Creates the dashboard routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/stats", get(get_dashboard_stats))
        .route("/dashboard/activity", get(get_dashboard_activity))
}

/// An activity entry with the class of its icon.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    #[serde(flatten)]
    activity: RecentActivity,
    class_name: &'static str,
}

/// A headline tile with its trend arrow and color.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    #[serde(flatten)]
    stat: QuickStat,
    trend_icon: &'static str,
    trend_color: &'static str,
}

/// Body of `GET /dashboard/activity`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardActivity {
    /// Recent activity, newest first.
    pub activities: Vec<ActivityEntry>,
    /// Headline tiles.
    pub quick_stats: Vec<Tile>,
}

/// GET /dashboard/stats - Live counters computed from the store.
async fn get_dashboard_stats(
    State(state): State<AppState>,
    admin: AuthAdmin,
) -> Json<DashboardStats> {
    let users = state.store.list();
    let stats = DashboardStats::aggregate(
        &users,
        &state.library.sounds,
        &state.library.gift_codes(),
        Utc::now().date_naive(),
    );
    debug!(admin = %admin.email(), total_users = stats.total_users, "Dashboard stats served");
    Json(stats)
}

/// GET /dashboard/activity - Recent activity with the newest signups on top.
async fn get_dashboard_activity(State(state): State<AppState>) -> Json<DashboardActivity> {
    let now = Utc::now();
    let mut feed = ActivityFeed::canned();
    for user in state.store.list().iter().take(SIGNUPS_IN_FEED).rev() {
        feed.push(RecentActivity::joined(user, now));
    }

    Json(DashboardActivity {
        activities: feed
            .iter()
            .map(|activity| ActivityEntry {
                class_name: activity.kind.css_class(),
                activity: activity.clone(),
            })
            .collect(),
        quick_stats: quick_stats()
            .into_iter()
            .map(|stat| Tile {
                trend_icon: stat.trend.icon(),
                trend_color: stat.trend.color(),
                stat,
            })
            .collect(),
    })
}
