//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api`
//! - Bearer token middleware
//! - The in-memory user store, sound library and gift code ledger

pub mod error;
pub mod middleware;
pub mod routes;
pub mod store;

use std::sync::Arc;

use axum::Router;
use axum::http::header;
use chrono::{DateTime, Utc};
use sleepdash_core::auth::{AdminAccount, PasswordError, hash_password};
use sleepdash_core::fixtures::Fixtures;
use sleepdash_shared::config::AppConfig;
use sleepdash_shared::{JwtConfig, JwtService};
use tower_http::cors::{Any, CorsLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::store::{Library, UserStore};

/// Password of every generated fixture user.
pub const FIXTURE_USER_PASSWORD: &str = "password123";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// App users.
    pub store: Arc<UserStore>,
    /// Sounds and gift codes.
    pub library: Arc<Library>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// The operator account accepted by admin login.
    pub admin: Arc<AdminAccount>,
}

impl AppState {
    /// Builds state from configuration, seeding the store from fixtures.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError` if a password cannot be hashed.
    pub fn from_config(config: &AppConfig, now: DateTime<Utc>) -> Result<Self, PasswordError> {
        let admin = AdminAccount::new(
            &config.admin.email,
            &config.admin.name,
            &config.admin.password,
        )?;

        let fixtures = Fixtures::new(config.fixtures.seed);
        let user_hash = hash_password(FIXTURE_USER_PASSWORD)?;
        let store = UserStore::with_users(fixtures.users(
            config.fixtures.user_count,
            &user_hash,
            now,
        ));
        let gift_codes = fixtures.gift_codes(config.fixtures.gift_code_count, now.date_naive());
        let code_count = gift_codes.len();
        let library = Library::new(
            fixtures.sounds(config.fixtures.sound_count, now),
            gift_codes,
            fixtures.batch_rng(),
        );

        info!(
            seed = config.fixtures.seed,
            users = store.len(),
            sounds = library.sounds.len(),
            gift_codes = code_count,
            "Seeded in-memory store"
        );

        Ok(Self {
            store: Arc::new(store),
            library: Arc::new(library),
            jwt_service: Arc::new(JwtService::new(JwtConfig::from(&config.jwt))),
            admin: Arc::new(admin),
        })
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetSensitiveRequestHeadersLayer::new([header::AUTHORIZATION]))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{
        Router,
        body::Body,
        http::{Request, Response, header},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use sleepdash_shared::AdminRole;
    use sleepdash_shared::config::{AppConfig, FixtureConfig};
    use tower::ServiceExt;

    use super::{AppState, create_router};

    pub(crate) fn state() -> AppState {
        let config = AppConfig {
            fixtures: FixtureConfig {
                seed: 42,
                user_count: 12,
                sound_count: 6,
                gift_code_count: 8,
            },
            ..AppConfig::default()
        };
        AppState::from_config(&config, chrono::Utc::now()).unwrap()
    }

    pub(crate) fn admin_token(state: &AppState) -> String {
        state
            .jwt_service
            .generate_access_token(state.admin.email(), AdminRole::SuperAdmin)
            .unwrap()
    }

    pub(crate) fn app(state: &AppState) -> Router {
        create_router(state.clone())
    }

    pub(crate) async fn send(
        app: Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (axum::http::StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response: Response<Body> = app.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}
