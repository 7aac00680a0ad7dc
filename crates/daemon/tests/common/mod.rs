//! Shared harness for driving the full HTTP router in-process.

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::body::Body;
use axum::Router;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use ::common::auth::TokenIssuer;
use shelf_daemon::http_server::{self, Config};
use shelf_daemon::images::ImageStore;
use shelf_daemon::{Database, ServiceState};

pub const PUBLIC_URL: &str = "http://localhost:5001";
pub const BOUNDARY: &str = "shelf-test-boundary";
/// Lowest bcrypt cost, keeps the suite fast
const TEST_COST: u32 = 4;

pub struct TestApp {
    pub state: ServiceState,
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: http::HeaderMap,
    pub body: bytes::Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn message(&self) -> String {
        self.json()["message"].as_str().unwrap().to_string()
    }
}

pub async fn setup() -> TestApp {
    let state = ServiceState::new(
        Database::in_memory().await.unwrap(),
        ImageStore::memory(),
        TokenIssuer::new(b"integration-test-secret-with-enough-bytes"),
        TEST_COST,
        PUBLIC_URL.to_string(),
    );
    let config = Config::new(SocketAddr::from(([127, 0, 0, 1], 0)), None);
    let router = http_server::router(&config, state.clone());

    TestApp { state, router }
}

impl TestApp {
    /// Serve the router on an ephemeral local port, returning its base URL
    pub async fn serve(&self) -> url::Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        url::Url::parse(&format!("http://{}", addr)).unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(request(Method::GET, uri, token).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(request(Method::DELETE, uri, token).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send_json(Method::POST, uri, token, body).await
    }

    pub async fn put_json(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send_json(Method::PUT, uri, token, body).await
    }

    async fn send_json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> TestResponse {
        let request = request(method, uri, token)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Register `username` and log in, returning the session token
    pub async fn signup(&self, username: &str) -> String {
        let email = format!("{}@example.com", username);
        let response = self
            .post_json(
                "/api/register",
                None,
                json!({"username": username, "email": email, "password": "hunter22"}),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);

        self.login(&email, "hunter22").await
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post_json("/api/login", None, json!({"email": email, "password": password}))
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response.json()["token"].as_str().unwrap().to_string()
    }

    /// Register an account and promote it to administrator
    pub async fn signup_admin(&self, username: &str) -> String {
        let token = self.signup(username).await;
        self.state
            .catalog()
            .grant_admin(&format!("{}@example.com", username))
            .await
            .unwrap();
        token
    }

    pub async fn upload_book(&self, token: Option<&str>, form: &[Part<'_>]) -> TestResponse {
        let request = request(Method::POST, "/api/books", token)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(form)))
            .unwrap();
        self.send(request).await
    }

    /// Create a book through the API and return its id
    pub async fn add_book(&self, admin_token: &str, title: &str) -> String {
        let response = self.upload_book(Some(admin_token), &book_form(title)).await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.json()["_id"].as_str().unwrap().to_string()
    }
}

fn request(method: Method, uri: &str, token: Option<&str>) -> http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
        None => builder,
    }
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

pub const COVER_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot really a png";

pub fn book_form(title: &str) -> Vec<Part<'_>> {
    vec![
        Part::Text("title", title),
        Part::Text("author", "Jane Austen"),
        Part::Text("description", "A novel of manners"),
        Part::File {
            name: "image",
            file_name: "cover.png",
            content_type: "image/png",
            data: COVER_BYTES,
        },
    ]
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
