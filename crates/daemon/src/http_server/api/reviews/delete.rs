use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::http_server::api::extract::{parse_id, AuthUser};
use crate::http_server::api::ApiError;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let review_id = parse_id(&id, "Review not found.")?;
    state.catalog().delete_review(&user, review_id).await?;

    Ok(Json(DeleteResponse {
        message: "Review deleted successfully.".to_string(),
    }))
}
