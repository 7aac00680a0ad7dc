//! Row shapes as read back from SQLite.

use time::OffsetDateTime;

use common::models::{Book, Rating, RatingError, Review, ReviewAuthor, ReviewWithAuthor, StoredUser, User};

use super::types::{DBool, DUuid};

#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: DUuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: DBool,
}

impl From<UserRow> for StoredUser {
    fn from(row: UserRow) -> Self {
        StoredUser {
            user: User {
                id: row.id.into(),
                username: row.username,
                email: row.email,
                is_admin: row.is_admin.into(),
            },
            password_hash: row.password_hash,
        }
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        StoredUser::from(row).user
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct BookRow {
    pub id: DUuid,
    pub title: String,
    pub author: String,
    pub description: String,
    pub image: String,
    pub average_rating: f64,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: row.id.into(),
            title: row.title,
            author: row.author,
            description: row.description,
            image: row.image,
            average_rating: row.average_rating,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: DUuid,
    pub user_id: DUuid,
    pub book_id: DUuid,
    pub rating: i64,
    pub review_text: String,
    pub created_at: OffsetDateTime,
}

impl TryFrom<ReviewRow> for Review {
    type Error = RatingError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        Ok(Review {
            id: row.id.into(),
            user_id: row.user_id.into(),
            book_id: row.book_id.into(),
            rating: Rating::new(row.rating)?,
            review_text: row.review_text,
            created_at: row.created_at,
        })
    }
}

/// A review joined with its author's username
#[derive(Debug, sqlx::FromRow)]
pub struct ReviewWithAuthorRow {
    pub id: DUuid,
    pub user_id: DUuid,
    pub username: String,
    pub book_id: DUuid,
    pub rating: i64,
    pub review_text: String,
    pub created_at: OffsetDateTime,
}

impl TryFrom<ReviewWithAuthorRow> for ReviewWithAuthor {
    type Error = RatingError;

    fn try_from(row: ReviewWithAuthorRow) -> Result<Self, Self::Error> {
        Ok(ReviewWithAuthor {
            id: row.id.into(),
            user: ReviewAuthor {
                id: row.user_id.into(),
                username: row.username,
            },
            book: row.book_id.into(),
            rating: Rating::new(row.rating)?,
            review_text: row.review_text,
            created_at: row.created_at,
        })
    }
}
