use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};

use common::models::Book;

use crate::http_server::api::client::{ApiRequest, ClientError};
use crate::http_server::api::ApiError;
use crate::ServiceState;

#[derive(Debug, Clone, Default)]
pub struct ListRequest;

pub type ListResponse = Vec<Book>;

pub async fn handler(State(state): State<ServiceState>) -> Result<impl IntoResponse, ApiError> {
    let books = state.catalog().list_books().await?;
    Ok(Json(books))
}

impl ApiRequest for ListRequest {
    type Response = ListResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ClientError> {
        let full_url = base_url.join("/api/books")?;
        Ok(client.get(full_url))
    }
}
