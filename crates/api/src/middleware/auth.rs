//! Bearer token middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sleepdash_shared::{AdminRole, Claims, JwtError};
use tracing::debug;

use crate::AppState;

fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn reject(status: StatusCode, error: &str, message: &str) -> Response {
    (status, Json(json!({ "error": error, "message": message }))).into_response()
}

/// Validates the `Authorization: Bearer <jwt>` header.
///
/// Valid operator claims are stored in request extensions for
/// [`AuthAdmin`]. Missing, invalid or expired tokens get a 401; tokens
/// issued to app users get a 403.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token);

    let Some(token) = token else {
        return reject(
            StatusCode::UNAUTHORIZED,
            "missing_token",
            "Authorization header with Bearer token is required",
        );
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) if claims.role.is_admin() => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Ok(claims) => {
            debug!(subject = %claims.subject(), "Non-operator token rejected");
            reject(
                StatusCode::FORBIDDEN,
                "forbidden",
                "Administrator access is required",
            )
        }
        Err(JwtError::Expired) => {
            reject(StatusCode::UNAUTHORIZED, "token_expired", "Token has expired")
        }
        Err(e) => {
            debug!(error = %e, "Token rejected");
            reject(
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid or malformed token",
            )
        }
    }
}

/// Claims of the authenticated operator.
///
/// Only available behind [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthAdmin(pub Claims);

impl AuthAdmin {
    /// Operator email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.0.subject()
    }

    /// Operator role.
    #[must_use]
    pub const fn role(&self) -> AdminRole {
        self.0.role
    }
}

impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthAdmin)
            .ok_or_else(|| {
                reject(
                    StatusCode::UNAUTHORIZED,
                    "unauthorized",
                    "Authentication required",
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Bearer abc", Some("abc"))]
    #[case("bearer abc", Some("abc"))]
    #[case("Bearer ", None)]
    #[case("Basic abc", None)]
    #[case("abc", None)]
    fn test_extract_bearer_token(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_bearer_token(header), expected);
    }
}
