use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use uuid::Uuid;

use common::models::BookDetail;

use crate::http_server::api::client::{ApiRequest, ClientError};
use crate::http_server::api::extract::parse_id;
use crate::http_server::api::ApiError;
use crate::ServiceState;

#[derive(Debug, Clone)]
pub struct GetRequest {
    pub book_id: Uuid,
}

/// `{book, reviews}`, reviews carrying their author's username
pub type GetResponse = BookDetail;

pub async fn handler(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let book_id = parse_id(&id, "Book not found")?;
    let detail = state.catalog().book_detail(book_id).await?;
    Ok(Json(detail))
}

impl ApiRequest for GetRequest {
    type Response = GetResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ClientError> {
        let full_url = base_url.join(&format!("/api/books/{}", self.book_id))?;
        Ok(client.get(full_url))
    }
}
