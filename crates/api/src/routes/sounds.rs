//! Sound library routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Serialize;
use sleepdash_core::sounds::{LibraryTotals, Sound, SoundFilter};

use crate::AppState;

/// Creates the sound routes. Public.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sounds", get(list_sounds))
        .route("/sounds/stats", get(library_stats))
}

/// Body of `GET /sounds/stats`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStats {
    #[serde(flatten)]
    totals: LibraryTotals,
    duration_label: String,
}

/// GET /sounds - The library, optionally filtered by `search`, `category`
/// and `premium`.
async fn list_sounds(
    State(state): State<AppState>,
    Query(filter): Query<SoundFilter>,
) -> Json<Vec<Sound>> {
    Json(
        filter
            .apply(&state.library.sounds)
            .into_iter()
            .cloned()
            .collect(),
    )
}

/// GET /sounds/stats - Library totals.
async fn library_stats(State(state): State<AppState>) -> Json<LibraryStats> {
    let totals = LibraryTotals::from_sounds(&state.library.sounds);
    Json(LibraryStats {
        duration_label: totals.duration_label(),
        totals,
    })
}
