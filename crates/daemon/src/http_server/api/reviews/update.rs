use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use common::models::Review;
use common::policy::ReviewChanges;

use crate::http_server::api::extract::{parse_id, ApiJson, AuthUser};
use crate::http_server::api::ApiError;
use crate::ServiceState;

/// Absent fields are left unchanged
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub review_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub message: String,
    pub review: Review,
}

pub async fn handler(
    State(state): State<ServiceState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let review_id = parse_id(&id, "Review not found.")?;

    let review = state
        .catalog()
        .update_review(
            &user,
            review_id,
            ReviewChanges {
                rating: req.rating,
                review_text: req.review_text,
            },
        )
        .await?;

    Ok(Json(UpdateResponse {
        message: "Review updated successfully".to_string(),
        review,
    }))
}
