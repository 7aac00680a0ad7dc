use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::http_server::api::ApiError;
use crate::ServiceState;

/// Covers never change once stored
const CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

pub async fn handler(
    State(state): State<ServiceState>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    let image = state
        .images()
        .get(&key)
        .await?
        .ok_or_else(|| ApiError::NotFound("Image not found".to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, image.content_type),
            (header::CACHE_CONTROL, CACHE_CONTROL.to_string()),
        ],
        image.data,
    )
        .into_response())
}
