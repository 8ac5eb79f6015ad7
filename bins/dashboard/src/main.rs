//! SleepDash dashboard
//!
//! Restores the operator session, keeps the dashboard stats refreshed, and
//! logs every snapshot until interrupted.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sleepdash_client::{ApiClient, DashboardView, FileSessionStore, SessionContext, Source};
use sleepdash_shared::AppConfig;

/// Used when `RUST_LOG` is unset. Covers this binary and the library crates.
const DEFAULT_FILTER: &str = "dashboard=info,sleepdash=info";

/// Signs in with the configured credentials. Gives up after `timeout` so an
/// unresponsive backend cannot hold back the first refresh.
async fn sign_in(client: &ApiClient, email: &str, password: &str, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, client.admin_login(email, password)).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            warn!(error = %e, "Login failed, continuing without a session");
            false
        }
        Err(_) => {
            warn!(
                timeout_ms = timeout.as_millis(),
                "Login timed out, continuing without a session"
            );
            false
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let store = FileSessionStore::new(config.client.session_path.clone());
    let session = Arc::new(SessionContext::new(Arc::new(store)));
    let client = ApiClient::new(&config.client.api_url, Arc::clone(&session))?;

    match session.init().await {
        Some(profile) => info!(email = %profile.email, "Resumed session"),
        None if config.client.auto_login => {
            sign_in(
                &client,
                &config.admin.email,
                &config.admin.password,
                config.request_timeout(),
            )
            .await;
        }
        None => warn!("No session; stats will fall back until an operator signs in"),
    }

    match tokio::time::timeout(config.request_timeout(), client.health()).await {
        Ok(Ok(health)) => info!(
            status = %health.status,
            version = health.version.as_deref().unwrap_or("unknown"),
            "Backend reachable"
        ),
        Ok(Err(e)) => warn!(error = %e, "Backend health check failed"),
        Err(_) => warn!("Backend health check timed out"),
    }

    let view = DashboardView::new(client, config.request_timeout());
    let mut updates = view.subscribe();
    view.activate(config.refresh_interval());
    info!(
        api = %config.client.api_url,
        period_secs = config.client.refresh_interval_secs,
        "Dashboard active"
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                let stats = state.stats;
                match &state.source {
                    Some(Source::Fallback(reason)) => warn!(
                        %reason,
                        total_users = stats.total_users,
                        "Showing fallback stats"
                    ),
                    _ => info!(
                        total_users = stats.total_users,
                        active_subscriptions = stats.active_subscriptions,
                        premium_users = stats.premium_users,
                        monthly_revenue = %stats.monthly_revenue,
                        today_sleep_sessions = stats.today_sleep_sessions,
                        "Stats updated"
                    ),
                }
            }
        }
    }

    view.deactivate();
    info!("Dashboard stopped");
    Ok(())
}
