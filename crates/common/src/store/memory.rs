use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::provider::{CatalogStore, StoreError};
use crate::models::{
    Book, NewBook, NewReview, NewUser, Rating, Review, ReviewAuthor, ReviewUpdate,
    ReviewWithAuthor, StoredUser, User,
};
use crate::rating;

/// In-memory catalog store.
///
/// Books and reviews are kept in insertion order so listings match
///  what the SQLite store returns.
#[derive(Debug, Clone)]
pub struct MemoryCatalogStore {
    inner: Arc<RwLock<MemoryCatalogStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryCatalogStoreInner {
    users: HashMap<Uuid, StoredUser>,
    /// email -> user id
    emails: HashMap<String, Uuid>,
    books: Vec<Book>,
    reviews: Vec<Review>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryCatalogStoreError {
    #[error("memory store error: {0}")]
    Internal(String),
}

type Result<T> = std::result::Result<T, StoreError<MemoryCatalogStoreError>>;

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryCatalogStoreInner::default())),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryCatalogStoreInner>> {
        self.inner.read().map_err(|e| {
            StoreError::Provider(MemoryCatalogStoreError::Internal(format!(
                "failed to acquire read lock: {}",
                e
            )))
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryCatalogStoreInner>> {
        self.inner.write().map_err(|e| {
            StoreError::Provider(MemoryCatalogStoreError::Internal(format!(
                "failed to acquire write lock: {}",
                e
            )))
        })
    }
}

impl Default for MemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    type Error = MemoryCatalogStoreError;

    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let mut inner = self.write()?;

        if inner.emails.contains_key(&user.email) {
            return Err(StoreError::Conflict(format!(
                "email {} is already registered",
                user.email
            )));
        }

        let created = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            is_admin: false,
        };
        inner.emails.insert(created.email.clone(), created.id);
        inner.users.insert(
            created.id,
            StoredUser {
                user: created.clone(),
                password_hash: user.password_hash,
            },
        );

        Ok(created)
    }

    async fn user(&self, id: Uuid) -> Result<Option<User>> {
        let inner = self.read()?;
        Ok(inner.users.get(&id).map(|stored| stored.user.clone()))
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<StoredUser>> {
        let inner = self.read()?;
        Ok(inner
            .emails
            .get(email)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn count_users(&self) -> Result<u64> {
        Ok(self.read()?.users.len() as u64)
    }

    async fn grant_admin(&self, email: &str) -> Result<Option<User>> {
        let mut inner = self.write()?;
        let Some(id) = inner.emails.get(email).copied() else {
            return Ok(None);
        };

        Ok(inner.users.get_mut(&id).map(|stored| {
            stored.user.is_admin = true;
            stored.user.clone()
        }))
    }

    async fn insert_book(&self, book: NewBook) -> Result<Book> {
        let mut inner = self.write()?;
        let created = Book {
            id: Uuid::new_v4(),
            title: book.title,
            author: book.author,
            description: book.description,
            image: book.image,
            average_rating: 0.0,
        };
        inner.books.push(created.clone());
        Ok(created)
    }

    async fn book(&self, id: Uuid) -> Result<Option<Book>> {
        let inner = self.read()?;
        Ok(inner.books.iter().find(|b| b.id == id).cloned())
    }

    async fn list_books(&self) -> Result<Vec<Book>> {
        Ok(self.read()?.books.clone())
    }

    async fn top_books(&self, limit: usize) -> Result<Vec<Book>> {
        let mut books = self.read()?.books.clone();
        // stable sort keeps insertion order among ties
        books.sort_by(|a, b| {
            b.average_rating
                .partial_cmp(&a.average_rating)
                .unwrap_or(Ordering::Equal)
        });
        books.truncate(limit);
        Ok(books)
    }

    async fn count_books(&self) -> Result<u64> {
        Ok(self.read()?.books.len() as u64)
    }

    async fn recompute_average(&self, book_id: Uuid) -> Result<f64> {
        let mut inner = self.write()?;
        let ratings: Vec<Rating> = inner
            .reviews
            .iter()
            .filter(|r| r.book_id == book_id)
            .map(|r| r.rating)
            .collect();
        let avg = rating::average(&ratings);

        if let Some(book) = inner.books.iter_mut().find(|b| b.id == book_id) {
            book.average_rating = avg;
        }
        Ok(avg)
    }

    async fn insert_review(&self, review: NewReview) -> Result<Review> {
        let mut inner = self.write()?;

        // checked under the write lock, so two racing inserts cannot both pass
        if inner
            .reviews
            .iter()
            .any(|r| r.user_id == review.user_id && r.book_id == review.book_id)
        {
            return Err(StoreError::Conflict(format!(
                "user {} already reviewed book {}",
                review.user_id, review.book_id
            )));
        }

        let created = Review {
            id: Uuid::new_v4(),
            user_id: review.user_id,
            book_id: review.book_id,
            rating: review.rating,
            review_text: review.review_text,
            created_at: review.created_at,
        };
        inner.reviews.push(created.clone());
        Ok(created)
    }

    async fn review(&self, id: Uuid) -> Result<Option<Review>> {
        let inner = self.read()?;
        Ok(inner.reviews.iter().find(|r| r.id == id).cloned())
    }

    async fn review_by(&self, user_id: Uuid, book_id: Uuid) -> Result<Option<Review>> {
        let inner = self.read()?;
        Ok(inner
            .reviews
            .iter()
            .find(|r| r.user_id == user_id && r.book_id == book_id)
            .cloned())
    }

    async fn reviews_for_book(&self, book_id: Uuid) -> Result<Vec<ReviewWithAuthor>> {
        let inner = self.read()?;
        Ok(inner
            .reviews
            .iter()
            .filter(|r| r.book_id == book_id)
            .filter_map(|r| {
                // reviews of deleted accounts are dropped, as a join would
                let author = inner.users.get(&r.user_id)?;
                Some(ReviewWithAuthor {
                    id: r.id,
                    user: ReviewAuthor {
                        id: author.user.id,
                        username: author.user.username.clone(),
                    },
                    book: r.book_id,
                    rating: r.rating,
                    review_text: r.review_text.clone(),
                    created_at: r.created_at,
                })
            })
            .collect())
    }

    async fn update_review(&self, id: Uuid, update: ReviewUpdate) -> Result<Option<Review>> {
        let mut inner = self.write()?;
        let Some(review) = inner.reviews.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };

        if let Some(rating) = update.rating {
            review.rating = rating;
        }
        if let Some(text) = update.review_text {
            review.review_text = text;
        }

        Ok(Some(review.clone()))
    }

    async fn delete_review(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.write()?;
        let before = inner.reviews.len();
        inner.reviews.retain(|r| r.id != id);
        Ok(inner.reviews.len() < before)
    }

    async fn count_reviews(&self) -> Result<u64> {
        Ok(self.read()?.reviews.len() as u64)
    }
}
