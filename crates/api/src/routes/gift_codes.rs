//! Gift code routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::Utc;
use serde::Serialize;
use sleepdash_core::gift_codes::{GiftCode, GiftCodeBatch, GiftCodeFilter, GiftCodeStats};
use sleepdash_shared::AppError;
use tracing::info;

use crate::{AppState, error::ApiResult, middleware::AuthAdmin};

/// Creates the gift code routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/gift-codes", get(list_gift_codes).post(issue_gift_codes))
}

/// Body of `GET /gift-codes`.
#[derive(Debug, Serialize)]
pub struct GiftCodeList {
    /// Codes passing the filter, newest batch first.
    pub codes: Vec<GiftCode>,
    /// Figures over every issued code, ignoring the filter.
    pub stats: GiftCodeStats,
}

/// Body of `POST /gift-codes`.
#[derive(Debug, Serialize)]
pub struct IssuedCodes {
    /// The new codes.
    pub codes: Vec<GiftCode>,
}

/// GET /gift-codes - Issued codes, optionally filtered by `search` and
/// `status`.
async fn list_gift_codes(
    State(state): State<AppState>,
    Query(filter): Query<GiftCodeFilter>,
) -> Json<GiftCodeList> {
    let all = state.library.gift_codes();
    Json(GiftCodeList {
        codes: filter.apply(&all).into_iter().cloned().collect(),
        stats: GiftCodeStats::from_codes(&all),
    })
}

/// POST /gift-codes - Issue a batch of single-use codes.
async fn issue_gift_codes(
    State(state): State<AppState>,
    admin: AuthAdmin,
    Json(batch): Json<GiftCodeBatch>,
) -> ApiResult<(StatusCode, Json<IssuedCodes>)> {
    batch.validate().map_err(AppError::Validation)?;

    let codes = state.library.issue(&batch, Utc::now().date_naive());
    info!(
        admin = %admin.email(),
        quantity = codes.len(),
        prefix = %batch.prefix,
        "Gift codes issued"
    );
    Ok((StatusCode::CREATED, Json(IssuedCodes { codes })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_support::{admin_token, app, send, state};

    #[tokio::test]
    async fn test_list_requires_token() {
        let (status, _) = send(app(&state()), "GET", "/api/gift-codes", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_list_with_stats() {
        let state = state();
        let token = admin_token(&state);

        let (status, body) = send(app(&state), "GET", "/api/gift-codes", Some(&token), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["codes"].as_array().unwrap().len(), 8);
        assert_eq!(body["stats"]["total"], 8);
        assert!(body["stats"]["conversionRate"].is_u64());
    }

    #[tokio::test]
    async fn test_status_filter_keeps_full_stats() {
        let state = state();
        let token = admin_token(&state);
        let redeemed = state
            .library
            .gift_codes()
            .iter()
            .filter(|c| c.status == sleepdash_core::gift_codes::GiftCodeStatus::Redeemed)
            .count();

        let (status, body) = send(
            app(&state),
            "GET",
            "/api/gift-codes?status=redeemed",
            Some(&token),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let codes = body["codes"].as_array().unwrap();
        assert_eq!(codes.len(), redeemed);
        assert!(codes.iter().all(|c| c["status"] == "redeemed"));
        assert_eq!(body["stats"]["total"], 8);
    }

    #[tokio::test]
    async fn test_issue_batch_then_list() {
        let state = state();
        let token = admin_token(&state);

        let (status, body) = send(
            app(&state),
            "POST",
            "/api/gift-codes",
            Some(&token),
            Some(json!({ "type": "sound-pack", "quantity": 3, "prefix": "calm" })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        let issued = body["codes"].as_array().unwrap();
        assert_eq!(issued.len(), 3);
        assert!(issued.iter().all(|c| c["code"].as_str().unwrap().starts_with("CALM-")));
        assert!(issued.iter().all(|c| c["type"] == "sound-pack" && c["status"] == "active"));

        let (_, body) = send(app(&state), "GET", "/api/gift-codes", Some(&token), None).await;
        assert_eq!(body["stats"]["total"], 11);
        assert_eq!(body["codes"][0]["code"], issued[0]["code"]);
    }

    #[tokio::test]
    async fn test_issue_rejects_bad_batch() {
        let state = state();
        let token = admin_token(&state);

        let (status, body) = send(
            app(&state),
            "POST",
            "/api/gift-codes",
            Some(&token),
            Some(json!({ "quantity": 0 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(state.library.gift_codes().len(), 8);
    }
}
