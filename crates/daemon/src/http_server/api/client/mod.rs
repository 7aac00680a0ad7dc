mod client;
mod error;

pub use client::ApiClient;
pub use error::ClientError;

use reqwest::{Client, RequestBuilder};
use url::Url;

/// An API operation the typed client can perform.
///
/// Implemented next to the handler that serves it, so the request shape
///  and the route it is sent to stay together.
pub trait ApiRequest {
    type Response: serde::de::DeserializeOwned;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ClientError>;
}
