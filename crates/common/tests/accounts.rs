//! Integration tests for registration, login and token checks

mod common;

use ::common::auth::TokenIssuer;
use ::common::error::ErrorKind;
use time::Duration;

#[tokio::test]
async fn test_register_and_login() {
    let catalog = common::setup_catalog();

    let user = common::register(&catalog, "ada").await;
    assert_eq!(user.username, "ada");
    assert_eq!(user.email, "ada@example.com");
    assert!(!user.is_admin);

    let session = catalog
        .login("ada@example.com", "ada-password")
        .await
        .unwrap();
    assert_eq!(session.user, user);

    let claims = catalog.tokens().verify(&session.token).unwrap();
    assert_eq!(claims.sub, user.id);
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let catalog = common::setup_catalog();

    let mut missing = common::registration("ada");
    missing.username = "   ".to_string();
    let err = catalog.register(missing).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invalid);

    let mut bad_email = common::registration("ada");
    bad_email.email = "not-an-email".to_string();
    let err = catalog.register(bad_email).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invalid);
    assert_eq!(err.to_string(), "Please provide a valid email address.");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let catalog = common::setup_catalog();
    common::register(&catalog, "ada").await;

    let mut again = common::registration("ada");
    again.username = "someone-else".to_string();
    let err = catalog.register(again).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Invalid);
    assert_eq!(err.to_string(), "Email is already registered.");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let catalog = common::setup_catalog();
    common::register(&catalog, "ada").await;

    let wrong_password = catalog
        .login("ada@example.com", "nope")
        .await
        .unwrap_err();
    let unknown_email = catalog
        .login("nobody@example.com", "ada-password")
        .await
        .unwrap_err();

    assert_eq!(wrong_password.kind(), ErrorKind::Invalid);
    assert_eq!(wrong_password.to_string(), "Invalid credentials");
    assert_eq!(unknown_email.to_string(), wrong_password.to_string());
}

#[tokio::test]
async fn test_authenticate() {
    let catalog = common::setup_catalog();
    let user = common::register(&catalog, "ada").await;
    let header = common::bearer(&catalog, "ada").await;

    let resolved = catalog.authenticate(Some(&header)).await.unwrap();
    assert_eq!(resolved, user);

    let err = catalog.authenticate(None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    assert_eq!(err.to_string(), "No token, authorization denied");

    let err = catalog
        .authenticate(Some("Bearer not.a.token"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    assert_eq!(err.to_string(), "Token is not valid");

    let err = catalog.authenticate(Some("Basic abc")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthenticated);
}

#[tokio::test]
async fn test_authenticate_rejects_expired_token() {
    let catalog = common::setup_catalog();
    let user = common::register(&catalog, "ada").await;

    let expired = TokenIssuer::with_ttl(common::SECRET, Duration::seconds(-30))
        .issue(user.id)
        .unwrap();
    let err = catalog
        .authenticate(Some(&format!("Bearer {}", expired)))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    assert_eq!(err.to_string(), "Token has expired");
}

#[tokio::test]
async fn test_authenticate_rejects_foreign_token() {
    let catalog = common::setup_catalog();
    let user = common::register(&catalog, "ada").await;

    let forged = TokenIssuer::new(b"some-other-secret").issue(user.id).unwrap();
    let err = catalog
        .authenticate(Some(&format!("Bearer {}", forged)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthenticated);
}

#[tokio::test]
async fn test_authorize_admin() {
    let catalog = common::setup_catalog();
    common::register(&catalog, "reader").await;
    let admin = common::register_admin(&catalog, "admin").await;
    assert!(admin.is_admin);

    let reader = common::bearer(&catalog, "reader").await;
    let err = catalog.authorize_admin(Some(&reader)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert_eq!(err.to_string(), "Admin only");

    let err = catalog.authorize_admin(None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthenticated);

    let header = common::bearer(&catalog, "admin").await;
    let resolved = catalog.authorize_admin(Some(&header)).await.unwrap();
    assert_eq!(resolved.id, admin.id);
}

#[tokio::test]
async fn test_grant_admin_unknown_email() {
    let catalog = common::setup_catalog();
    let err = catalog.grant_admin("ghost@example.com").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
