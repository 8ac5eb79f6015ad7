//! User management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sleepdash_core::auth::hash_password;
use sleepdash_core::users::analytics::{self, Engagement, RevenueByTier};
use sleepdash_core::users::{NewUser, SubscriptionStatus, SubscriptionTier, User, UserFilter};
use sleepdash_shared::AppError;
use sleepdash_shared::types::{PageRequest, PageSlot, UserId, total_pages, visible_pages};
use tracing::info;

use crate::{AppState, error::ApiResult, middleware::AuthAdmin};

/// Creates the user routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/analytics", get(user_analytics))
        .route("/users/{user_id}", get(get_user))
}

/// Query parameters for the user list.
#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    /// Page number, from 1.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
    /// Substring of name or email.
    pub search: Option<String>,
    /// Plan tier.
    pub tier: Option<SubscriptionTier>,
    /// Billing state.
    pub status: Option<SubscriptionStatus>,
}

/// A page of users.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    /// Users on this page.
    pub users: Vec<User>,
    /// Users matching the filter across all pages.
    pub total: u64,
    /// Current page.
    pub page: u32,
    /// Pages available.
    pub total_pages: u32,
    /// Page numbers for the pagination control.
    pub pages: Vec<PageSlot>,
}

/// GET /users - Filtered, paginated users, newest first.
async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Json<UserListResponse> {
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page).max(1),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };
    let filter = UserFilter {
        search: query.search.unwrap_or_default(),
        tier: query.tier,
        status: query.status,
    };

    let all = state.store.list();
    let matching: Vec<User> = filter.apply(&all).into_iter().cloned().collect();
    let total = matching.len() as u64;

    let pages = total_pages(total, page.per_page);
    Json(UserListResponse {
        users: page.slice(&matching).to_vec(),
        total,
        page: page.page,
        total_pages: pages,
        pages: visible_pages(page.page, pages),
    })
}

/// One row of the plans table.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    /// Plan tier.
    pub tier: SubscriptionTier,
    /// Display name.
    pub name: &'static str,
    /// Price label such as `$9.99/mo`.
    pub price: String,
    /// Users on this plan.
    pub users: u64,
}

/// Body of `GET /users/analytics`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnalytics {
    /// Registered users.
    pub total_users: u64,
    /// Users with an active subscription status.
    pub active_users: u64,
    /// Users on a paid tier.
    pub premium_users: u64,
    /// Users on an active paid plan.
    pub active_subscriptions: u64,
    /// List-price revenue, whole dollars.
    pub monthly_revenue: Decimal,
    /// Revenue per tier.
    pub revenue_by_tier: RevenueByTier,
    /// Users bucketed by sleep sessions.
    pub engagement: Engagement,
    /// Mean sleep quality score, rounded. Zero without users.
    pub average_sleep_quality: u64,
    /// Every plan with its price and user count.
    pub plans: Vec<PlanSummary>,
}

/// GET /users/analytics - Subscription and engagement figures.
async fn user_analytics(State(state): State<AppState>) -> Json<UserAnalytics> {
    let users = state.store.list();
    let total = users.len() as u64;
    let quality_sum: u64 = users
        .iter()
        .map(|u| u64::from(analytics::sleep_quality_score(u)))
        .sum();

    Json(UserAnalytics {
        total_users: total,
        active_users: analytics::active_count(&users),
        premium_users: analytics::premium_count(&users),
        active_subscriptions: analytics::active_subscription_count(&users),
        monthly_revenue: analytics::monthly_revenue(&users),
        revenue_by_tier: analytics::revenue_by_tier(&users),
        engagement: analytics::engagement(&users),
        average_sleep_quality: if total == 0 {
            0
        } else {
            (quality_sum * 2 + total) / (total * 2)
        },
        plans: SubscriptionTier::ALL
            .into_iter()
            .map(|tier| PlanSummary {
                tier,
                name: tier.display_name(),
                price: tier.price_label(),
                users: users.iter().filter(|u| u.subscription_type == tier).count() as u64,
            })
            .collect(),
    })
}

/// GET /users/{user_id} - One user.
async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> ApiResult<Json<User>> {
    state
        .store
        .get(user_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()).into())
}

/// POST /users - Register a user on behalf of the operator.
async fn create_user(
    State(state): State<AppState>,
    admin: AuthAdmin,
    Json(payload): Json<NewUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    payload.validate().map_err(AppError::Validation)?;
    if state.store.find_by_email(&payload.email).is_some() {
        return Err(AppError::Conflict("User already exists".to_string()).into());
    }

    let password_hash =
        hash_password(&payload.password).map_err(|e| AppError::Internal(e.to_string()))?;
    let now = Utc::now();
    let user = User {
        id: UserId::new(),
        name: payload.name.trim().to_string(),
        email: payload.email.trim().to_string(),
        password_hash,
        subscription_status: payload.subscription_status.unwrap_or_default(),
        subscription_type: payload.subscription_type.unwrap_or_default(),
        devices: 1,
        sleep_sessions: 0,
        last_login: now,
        created_at: now,
    };

    // The email index is the source of truth if two creates race.
    state.store.insert(user.clone())?;
    info!(user_id = %user.id, admin = %admin.email(), "User created");
    Ok((StatusCode::CREATED, Json(user)))
}
