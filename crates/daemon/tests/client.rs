mod common;

use http::StatusCode;
use uuid::Uuid;

use shelf_daemon::http_server::api::auth::login::LoginRequest;
use shelf_daemon::http_server::api::auth::register::RegisterRequest;
use shelf_daemon::http_server::api::books::get::GetRequest;
use shelf_daemon::http_server::api::books::list::ListRequest;
use shelf_daemon::http_server::api::client::{ApiClient, ClientError};

use crate::common::setup;

fn registration(username: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password: "hunter22".to_string(),
    }
}

#[tokio::test]
async fn test_client_register_login_and_browse() {
    let app = setup().await;
    let client = ApiClient::new(&app.serve().await).unwrap();

    let user = client.call(registration("ann")).await.unwrap();
    assert_eq!(user.username, "ann");
    assert!(!user.is_admin);

    let session = client
        .call(LoginRequest {
            email: "ann@example.com".to_string(),
            password: "hunter22".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(session.user, user);
    assert!(!session.token.is_empty());

    let admin = app.signup_admin("admin").await;
    let book_id: Uuid = app.add_book(&admin, "Emma").await.parse().unwrap();

    let books = client.call(ListRequest).await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id, book_id);

    let detail = client.call(GetRequest { book_id }).await.unwrap();
    assert_eq!(detail.book.title, "Emma");
    assert!(detail.reviews.is_empty());
}

#[tokio::test]
async fn test_client_surfaces_server_message() {
    let app = setup().await;
    let client = ApiClient::new(&app.serve().await).unwrap();

    client.call(registration("ann")).await.unwrap();
    let err = client.call(registration("ann")).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::HttpStatus(StatusCode::BAD_REQUEST, ref message)
            if message == "Email is already registered."
    ));

    let err = client
        .call(GetRequest {
            book_id: Uuid::new_v4(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::HttpStatus(StatusCode::NOT_FOUND, ref message) if message == "Book not found"
    ));
}
