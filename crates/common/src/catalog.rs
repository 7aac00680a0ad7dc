//! The book review service, independent of any transport.
//!
//! Every public operation of the API is a method on [`Catalog`]. Each
//!  one validates its input, checks access and ownership through
//!  [`crate::policy`], performs its reads and writes against the store
//!  one at a time, and for review mutations recomputes the book's
//!  average rating before returning.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::{hash_password, verify_password, TokenError, TokenIssuer, DEFAULT_COST};
use crate::error::CatalogError;
use crate::models::{AdminStats, Book, BookDetail, NewBook, NewReview, NewUser, Review, User};
use crate::policy::{self, AccessError, PolicyError, ReviewChanges, ReviewDraft};
use crate::rating;
use crate::store::{CatalogStore, StoreError};

/// Number of books reported in [`AdminStats::top_books`]
pub const TOP_BOOKS_LIMIT: usize = 5;

#[derive(Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub description: String,
    /// URL of the already stored cover image
    pub image: String,
}

/// A successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").expect("static email pattern"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

#[derive(Debug, Clone)]
pub struct Catalog<S> {
    store: S,
    tokens: Arc<TokenIssuer>,
    password_cost: u32,
}

type Result<T, S> = std::result::Result<T, CatalogError<<S as CatalogStore>::Error>>;

impl<S: CatalogStore> Catalog<S> {
    pub fn new(store: S, tokens: TokenIssuer) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
            password_cost: DEFAULT_COST,
        }
    }

    /// Override the bcrypt work factor used for new passwords
    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub async fn register(&self, registration: Registration) -> Result<User, S> {
        let username = registration.username.trim().to_string();
        let email = registration.email.trim().to_string();

        if username.is_empty() || email.is_empty() || registration.password.is_empty() {
            return Err(CatalogError::Invalid(
                "Username, email and password are required.".to_string(),
            ));
        }
        if !is_valid_email(&email) {
            return Err(CatalogError::Invalid(
                "Please provide a valid email address.".to_string(),
            ));
        }

        let password_hash = hash_password(&registration.password, self.password_cost)?;
        let user = self
            .store
            .insert_user(NewUser {
                username,
                email,
                password_hash,
            })
            .await
            .map_err(|e| -> CatalogError<S::Error> {
                match e {
                    StoreError::Conflict(_) => {
                        CatalogError::Invalid("Email is already registered.".to_string())
                    }
                    other => other.into(),
                }
            })?;

        tracing::info!(user_id = %user.id, "registered user");
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, S> {
        let Some(stored) = self.store.user_by_email(email.trim()).await? else {
            return Err(CatalogError::InvalidCredentials);
        };
        if !verify_password(password, &stored.password_hash)? {
            return Err(CatalogError::InvalidCredentials);
        }

        let token = self.tokens.issue(stored.user.id)?;
        tracing::debug!(user_id = %stored.user.id, "issued session token");

        Ok(Session {
            token,
            user: stored.user,
        })
    }

    /// Resolve the user behind an `Authorization` header value.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<User, S> {
        let header = authorization.ok_or_else(|| {
            AccessError::Unauthenticated("No token, authorization denied".to_string())
        })?;
        let token = policy::bearer_token(header)
            .ok_or_else(|| AccessError::Unauthenticated("Token is not valid".to_string()))?;

        let claims = self.tokens.verify(token).map_err(|e| match e {
            TokenError::Expired => AccessError::Unauthenticated("Token has expired".to_string()),
            TokenError::Invalid(_) => AccessError::Unauthenticated("Token is not valid".to_string()),
        })?;

        let user = self.store.user(claims.sub).await?.ok_or_else(|| {
            AccessError::Unauthenticated("User no longer exists".to_string())
        })?;

        Ok(user)
    }

    /// Authenticate, then require the administrator role. An
    ///  unauthenticated caller is reported before a non-admin one.
    pub async fn authorize_admin(&self, authorization: Option<&str>) -> Result<User, S> {
        let user = self.authenticate(authorization).await?;
        policy::require_admin(&user)?;
        Ok(user)
    }

    pub async fn list_books(&self) -> Result<Vec<Book>, S> {
        Ok(self.store.list_books().await?)
    }

    pub async fn book_detail(&self, book_id: Uuid) -> Result<BookDetail, S> {
        let book = self.existing_book(book_id).await?;
        let reviews = self.store.reviews_for_book(book_id).await?;
        Ok(BookDetail { book, reviews })
    }

    pub async fn create_book(&self, actor: &User, draft: BookDraft) -> Result<Book, S> {
        policy::require_admin(actor)?;

        if draft.image.trim().is_empty() {
            return Err(CatalogError::Invalid("Book image is required".to_string()));
        }
        let title = draft.title.trim();
        let author = draft.author.trim();
        let description = draft.description.trim();
        if title.is_empty() || author.is_empty() || description.is_empty() {
            return Err(CatalogError::Invalid(
                "Title, author and description are required.".to_string(),
            ));
        }

        let book = self
            .store
            .insert_book(NewBook {
                title: title.to_string(),
                author: author.to_string(),
                description: description.to_string(),
                image: draft.image,
            })
            .await?;

        tracing::info!(book_id = %book.id, admin_id = %actor.id, "created book");
        Ok(book)
    }

    pub async fn create_review(
        &self,
        actor: &User,
        book_id: Uuid,
        draft: ReviewDraft,
    ) -> Result<Review, S> {
        let (rating, review_text) = policy::validate_draft(draft)?;
        self.existing_book(book_id).await?;

        // friendly pre-check, the store enforces the same rule atomically
        if self.store.review_by(actor.id, book_id).await?.is_some() {
            return Err(already_reviewed().into());
        }

        let review = self
            .store
            .insert_review(NewReview {
                user_id: actor.id,
                book_id,
                rating,
                review_text,
                created_at: OffsetDateTime::now_utc(),
            })
            .await
            .map_err(|e| -> CatalogError<S::Error> {
                match e {
                    StoreError::Conflict(_) => already_reviewed().into(),
                    other => other.into(),
                }
            })?;

        rating::recompute(&self.store, book_id).await?;

        tracing::info!(review_id = %review.id, book_id = %book_id, user_id = %actor.id, "created review");
        Ok(review)
    }

    pub async fn update_review(
        &self,
        actor: &User,
        review_id: Uuid,
        changes: ReviewChanges,
    ) -> Result<Review, S> {
        let update = policy::validate_changes(changes)?;
        let review = self.existing_review(review_id).await?;
        policy::authorize_update(&review, actor)?;

        let updated = self
            .store
            .update_review(review_id, update)
            .await?
            .ok_or_else(review_not_found)?;

        rating::recompute(&self.store, updated.book_id).await?;

        tracing::info!(review_id = %review_id, user_id = %actor.id, "updated review");
        Ok(updated)
    }

    pub async fn delete_review(&self, actor: &User, review_id: Uuid) -> Result<(), S> {
        let review = self.existing_review(review_id).await?;
        policy::authorize_delete(&review, actor)?;

        if !self.store.delete_review(review_id).await? {
            return Err(review_not_found().into());
        }

        rating::recompute(&self.store, review.book_id).await?;

        tracing::info!(review_id = %review_id, user_id = %actor.id, "deleted review");
        Ok(())
    }

    pub async fn stats(&self, actor: &User) -> Result<AdminStats, S> {
        policy::require_admin(actor)?;

        Ok(AdminStats {
            total_users: self.store.count_users().await?,
            total_books: self.store.count_books().await?,
            total_reviews: self.store.count_reviews().await?,
            top_books: self.store.top_books(TOP_BOOKS_LIMIT).await?,
        })
    }

    /// Give the account registered under `email` the administrator role.
    pub async fn grant_admin(&self, email: &str) -> Result<User, S> {
        let user = self
            .store
            .grant_admin(email.trim())
            .await?
            .ok_or_else(|| PolicyError::NotFound(format!("No account uses email {}", email)))?;

        tracing::info!(user_id = %user.id, "granted administrator role");
        Ok(user)
    }

    async fn existing_book(&self, book_id: Uuid) -> Result<Book, S> {
        self.store
            .book(book_id)
            .await?
            .ok_or_else(|| PolicyError::NotFound("Book not found".to_string()).into())
    }

    async fn existing_review(&self, review_id: Uuid) -> Result<Review, S> {
        self.store
            .review(review_id)
            .await?
            .ok_or_else(|| review_not_found().into())
    }
}

fn already_reviewed() -> PolicyError {
    PolicyError::Duplicate("You have already reviewed this book.".to_string())
}

fn review_not_found() -> PolicyError {
    PolicyError::NotFound("Review not found.".to_string())
}
