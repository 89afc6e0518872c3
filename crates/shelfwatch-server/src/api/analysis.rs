use axum::{extract::State, Extension, Json};
use shelfwatch_analysis::AnalysisReport;

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// "Analyze Data": summary statistics plus the three chart datasets, computed
/// from a fresh read of the table.
pub(super) async fn get_analysis(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<AnalysisReport>>, ApiError> {
    let rows = shelfwatch_pipeline::load_and_coerce(&state.config)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: shelfwatch_analysis::analyze(&rows),
        meta: ResponseMeta::new(req_id.0),
    }))
}
