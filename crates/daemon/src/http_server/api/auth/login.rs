use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::catalog::Session;

use crate::http_server::api::client::{ApiRequest, ClientError};
use crate::http_server::api::extract::ApiJson;
use crate::http_server::api::ApiError;
use crate::ServiceState;

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// `{token, user}`
pub type LoginResponse = Session;

pub async fn handler(
    State(state): State<ServiceState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.catalog().login(&req.email, &req.password).await?;
    Ok(Json(session))
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ClientError> {
        let full_url = base_url.join("/api/login")?;
        Ok(client.post(full_url).json(&self))
    }
}
