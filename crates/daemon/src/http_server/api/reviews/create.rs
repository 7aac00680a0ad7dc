use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use common::models::Review;
use common::policy::ReviewDraft;

use crate::http_server::api::extract::{parse_id, ApiJson, AuthUser};
use crate::http_server::api::ApiError;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub review_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResponse {
    pub message: String,
    pub review: Review,
}

pub async fn handler(
    State(state): State<ServiceState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<CreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let book_id = parse_id(&id, "Book not found")?;

    let review = state
        .catalog()
        .create_review(
            &user,
            book_id,
            ReviewDraft {
                rating: req.rating,
                review_text: req.review_text,
            },
        )
        .await?;

    Ok((
        http::StatusCode::CREATED,
        Json(CreateResponse {
            message: "Review added successfully".to_string(),
            review,
        }),
    ))
}
