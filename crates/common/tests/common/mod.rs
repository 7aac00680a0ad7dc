//! Shared test utilities for catalog integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Barrier, Notify};
use uuid::Uuid;

use ::common::auth::TokenIssuer;
use ::common::catalog::{BookDraft, Catalog, Registration};
use ::common::models::{
    Book, NewBook, NewReview, NewUser, Review, ReviewUpdate, ReviewWithAuthor, StoredUser, User,
};
use ::common::store::{CatalogStore, MemoryCatalogStore, MemoryCatalogStoreError, StoreError};

pub const SECRET: &[u8] = b"integration-test-secret";

/// Cheapest bcrypt work factor, keeps the suite fast
pub const TEST_COST: u32 = 4;

pub type TestCatalog = Catalog<MemoryCatalogStore>;

pub fn setup_catalog() -> TestCatalog {
    catalog_over(MemoryCatalogStore::new())
}

pub fn catalog_over<S: CatalogStore>(store: S) -> Catalog<S> {
    Catalog::new(store, TokenIssuer::new(SECRET)).with_password_cost(TEST_COST)
}

pub fn registration(name: &str) -> Registration {
    Registration {
        username: name.to_string(),
        email: format!("{}@example.com", name),
        password: format!("{}-password", name),
    }
}

/// Register `name` and return the created user
pub async fn register<S: CatalogStore>(catalog: &Catalog<S>, name: &str) -> User {
    catalog.register(registration(name)).await.unwrap()
}

/// Register `name` and promote them to administrator
pub async fn register_admin<S: CatalogStore>(catalog: &Catalog<S>, name: &str) -> User {
    let user = register(catalog, name).await;
    catalog.grant_admin(&user.email).await.unwrap()
}

/// Log `name` in and return an `Authorization` header value
pub async fn bearer<S: CatalogStore>(catalog: &Catalog<S>, name: &str) -> String {
    let session = catalog
        .login(&format!("{}@example.com", name), &format!("{}-password", name))
        .await
        .unwrap();
    format!("Bearer {}", session.token)
}

pub async fn add_book<S: CatalogStore>(catalog: &Catalog<S>, admin: &User, title: &str) -> Book {
    catalog
        .create_book(
            admin,
            BookDraft {
                title: title.to_string(),
                author: "Some Author".to_string(),
                description: format!("All about {}", title),
                image: format!("/images/books/{}.png", title.to_lowercase()),
            },
        )
        .await
        .unwrap()
}

/// Pauses the first `recompute_average` after it has written, until released
#[derive(Debug, Default)]
pub struct RecomputeHold {
    taken: AtomicBool,
    /// signalled once the held recompute has written its mean
    pub written: Notify,
    pub release: Notify,
}

/// Memory store with hooks that force a given interleaving of
///  concurrent catalog calls.
#[derive(Debug, Clone, Default)]
pub struct SteppedStore {
    pub inner: MemoryCatalogStore,
    /// Every `review_by` waits here after reading
    pub pre_check: Option<Arc<Barrier>>,
    pub hold: Option<Arc<RecomputeHold>>,
}

type StepResult<T> = Result<T, StoreError<MemoryCatalogStoreError>>;

#[async_trait]
impl CatalogStore for SteppedStore {
    type Error = MemoryCatalogStoreError;

    async fn insert_user(&self, user: NewUser) -> StepResult<User> {
        self.inner.insert_user(user).await
    }

    async fn user(&self, id: Uuid) -> StepResult<Option<User>> {
        self.inner.user(id).await
    }

    async fn user_by_email(&self, email: &str) -> StepResult<Option<StoredUser>> {
        self.inner.user_by_email(email).await
    }

    async fn count_users(&self) -> StepResult<u64> {
        self.inner.count_users().await
    }

    async fn grant_admin(&self, email: &str) -> StepResult<Option<User>> {
        self.inner.grant_admin(email).await
    }

    async fn insert_book(&self, book: NewBook) -> StepResult<Book> {
        self.inner.insert_book(book).await
    }

    async fn book(&self, id: Uuid) -> StepResult<Option<Book>> {
        self.inner.book(id).await
    }

    async fn list_books(&self) -> StepResult<Vec<Book>> {
        self.inner.list_books().await
    }

    async fn top_books(&self, limit: usize) -> StepResult<Vec<Book>> {
        self.inner.top_books(limit).await
    }

    async fn count_books(&self) -> StepResult<u64> {
        self.inner.count_books().await
    }

    async fn recompute_average(&self, book_id: Uuid) -> StepResult<f64> {
        let avg = self.inner.recompute_average(book_id).await?;
        if let Some(hold) = &self.hold {
            if !hold.taken.swap(true, Ordering::SeqCst) {
                hold.written.notify_one();
                hold.release.notified().await;
            }
        }
        Ok(avg)
    }

    async fn insert_review(&self, review: NewReview) -> StepResult<Review> {
        self.inner.insert_review(review).await
    }

    async fn review(&self, id: Uuid) -> StepResult<Option<Review>> {
        self.inner.review(id).await
    }

    async fn review_by(&self, user_id: Uuid, book_id: Uuid) -> StepResult<Option<Review>> {
        let found = self.inner.review_by(user_id, book_id).await?;
        if let Some(barrier) = &self.pre_check {
            barrier.wait().await;
        }
        Ok(found)
    }

    async fn reviews_for_book(&self, book_id: Uuid) -> StepResult<Vec<ReviewWithAuthor>> {
        self.inner.reviews_for_book(book_id).await
    }

    async fn update_review(&self, id: Uuid, update: ReviewUpdate) -> StepResult<Option<Review>> {
        self.inner.update_review(id, update).await
    }

    async fn delete_review(&self, id: Uuid) -> StepResult<bool> {
        self.inner.delete_review(id).await
    }

    async fn count_reviews(&self) -> StepResult<u64> {
        self.inner.count_reviews().await
    }
}
