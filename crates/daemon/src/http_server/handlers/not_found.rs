use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::http_server::api::error::ErrorBody;

pub async fn not_found_handler() -> Response {
    let body = ErrorBody {
        message: "Route not found".to_string(),
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}
