use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use common::models::AdminStats;

use crate::http_server::api::extract::AdminUser;
use crate::http_server::api::ApiError;
use crate::ServiceState;

/// `{totalUsers, totalBooks, totalReviews, topBooks}`
pub type StatsResponse = AdminStats;

pub async fn handler(
    State(state): State<ServiceState>,
    AdminUser(admin): AdminUser,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state.catalog().stats(&admin).await?;
    Ok(Json(stats))
}
