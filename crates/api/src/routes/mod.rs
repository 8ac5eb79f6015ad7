//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod auth;
pub mod dashboard;
pub mod gift_codes;
pub mod health;
pub mod sounds;
pub mod users;

/// Creates the API router, wrapping operator-only routes in the auth
/// middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(dashboard::routes())
        .merge(gift_codes::routes())
        .merge(users::routes())
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(sounds::routes())
        .merge(protected_routes)
}
