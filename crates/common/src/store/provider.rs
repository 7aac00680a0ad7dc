use std::fmt::{Debug, Display};

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Book, NewBook, NewReview, NewUser, Review, ReviewUpdate, ReviewWithAuthor, StoredUser, User,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError<T> {
    /// Unhandled error from the backing store
    #[error("unhandled catalog store error: {0}")]
    Provider(#[from] T),
    /// A write would violate a uniqueness rule -- either a second
    ///  account for the same email or a second review by the same
    ///  user for the same book
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Persistence for users, books and reviews.
///
/// Implementations only store and fetch; validation, ownership checks and
///  rating aggregation live in [`crate::catalog::Catalog`]. Each method is
///  expected to be atomic on its own, nothing spans more than one call.
#[async_trait]
pub trait CatalogStore: Send + Sync + Debug + Clone + 'static {
    type Error: Display + Debug + Send + Sync + 'static;

    /// Insert a new account.
    ///
    /// Should fail with `Err(StoreError::Conflict)` if the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError<Self::Error>>;

    async fn user(&self, id: Uuid) -> Result<Option<User>, StoreError<Self::Error>>;

    /// Look up an account with its password hash, for login
    async fn user_by_email(&self, email: &str)
        -> Result<Option<StoredUser>, StoreError<Self::Error>>;

    async fn count_users(&self) -> Result<u64, StoreError<Self::Error>>;

    /// Set the administrator flag on the account with this email.
    ///
    /// # Returns
    /// * `Ok(Some(user))` - The updated account
    /// * `Ok(None)` - No account uses this email
    async fn grant_admin(&self, email: &str) -> Result<Option<User>, StoreError<Self::Error>>;

    async fn insert_book(&self, book: NewBook) -> Result<Book, StoreError<Self::Error>>;

    async fn book(&self, id: Uuid) -> Result<Option<Book>, StoreError<Self::Error>>;

    /// All books, oldest first
    async fn list_books(&self) -> Result<Vec<Book>, StoreError<Self::Error>>;

    /// The `limit` best rated books, highest average first.
    ///  Order among equal averages is unspecified.
    async fn top_books(&self, limit: usize) -> Result<Vec<Book>, StoreError<Self::Error>>;

    async fn count_books(&self) -> Result<u64, StoreError<Self::Error>>;

    /// Recompute a book's `average_rating` from the reviews it holds right
    ///  now, store it and return it. The read and the write happen as one
    ///  atomic step, so concurrent review mutations cannot leave a stale
    ///  mean behind. A book without reviews averages `0.0`.
    async fn recompute_average(&self, book_id: Uuid) -> Result<f64, StoreError<Self::Error>>;

    /// Insert a review.
    ///
    /// Should fail with `Err(StoreError::Conflict)` if the user already
    ///  holds a review for the book, even when racing another insert.
    async fn insert_review(&self, review: NewReview) -> Result<Review, StoreError<Self::Error>>;

    async fn review(&self, id: Uuid) -> Result<Option<Review>, StoreError<Self::Error>>;

    async fn review_by(
        &self,
        user_id: Uuid,
        book_id: Uuid,
    ) -> Result<Option<Review>, StoreError<Self::Error>>;

    /// Reviews of a book with their authors, oldest first
    async fn reviews_for_book(
        &self,
        book_id: Uuid,
    ) -> Result<Vec<ReviewWithAuthor>, StoreError<Self::Error>>;

    /// Apply a partial update, returning the updated review or `None`
    ///  if it does not exist
    async fn update_review(
        &self,
        id: Uuid,
        update: ReviewUpdate,
    ) -> Result<Option<Review>, StoreError<Self::Error>>;

    /// Returns whether a review was removed
    async fn delete_review(&self, id: Uuid) -> Result<bool, StoreError<Self::Error>>;

    async fn count_reviews(&self) -> Result<u64, StoreError<Self::Error>>;
}
