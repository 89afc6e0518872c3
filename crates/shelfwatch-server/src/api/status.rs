use axum::{extract::State, Extension, Json};
use shelfwatch_pipeline::RunStatus;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState, ResponseMeta};

pub(super) async fn get_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<RunStatus>>> {
    let ingest = state.ingest_status.read().await.clone();
    let refresh = state.refresh_status.read().await.clone();

    Json(ApiResponse {
        data: vec![ingest, refresh],
        meta: ResponseMeta::new(req_id.0),
    })
}
