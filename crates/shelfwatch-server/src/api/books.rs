use axum::{extract::State, Extension, Json};
use shelfwatch_analysis::CoercedListing;

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// "View Data": every row of the listings table, raw text and typed values.
pub(super) async fn list_books(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<CoercedListing>>>, ApiError> {
    let rows = shelfwatch_pipeline::load_and_coerce(&state.config)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows,
        meta: ResponseMeta::new(req_id.0),
    }))
}
