use axum::routing::{get, post, put};
use axum::Router;

pub mod admin;
pub mod auth;
pub mod books;
pub mod client;
pub mod error;
pub mod extract;
pub mod reviews;

pub use error::ApiError;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/register", post(auth::register::handler))
        .route("/login", post(auth::login::handler))
        .route("/books", get(books::list::handler).post(books::create::handler))
        .route("/books/:id", get(books::get::handler))
        .route("/books/:id/review", post(reviews::create::handler))
        .route(
            "/reviews/:id",
            put(reviews::update::handler).delete(reviews::delete::handler),
        )
        .route("/admin/stats", get(admin::stats::handler))
        .with_state(state)
}
