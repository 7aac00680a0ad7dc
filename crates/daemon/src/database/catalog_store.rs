use async_trait::async_trait;
use uuid::Uuid;

use common::models::{
    Book, NewBook, NewReview, NewUser, Review, ReviewUpdate, ReviewWithAuthor, StoredUser, User,
};
use common::store::{CatalogStore, StoreError};

use super::models::{BookRow, ReviewRow, ReviewWithAuthorRow, UserRow};
use super::types::{DBool, DUuid};
use super::Database;

type Result<T> = std::result::Result<T, StoreError<sqlx::Error>>;

const USER_COLUMNS: &str = "id, username, email, password_hash, is_admin";
const BOOK_COLUMNS: &str = "id, title, author, description, image, average_rating";
const REVIEW_COLUMNS: &str = "id, user_id, book_id, rating, review_text, created_at";

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

fn decode_review<R, T>(row: R) -> Result<T>
where
    T: TryFrom<R, Error = common::models::RatingError>,
{
    T::try_from(row).map_err(|e| StoreError::Provider(sqlx::Error::Decode(Box::new(e))))
}

#[async_trait]
impl CatalogStore for Database {
    type Error = sqlx::Error;

    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let id = DUuid::new();
        let is_admin = DBool::from(false);

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, is_admin)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(is_admin)
        .execute(&**self)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Conflict(format!("email {} is already registered", user.email))
            } else {
                StoreError::Provider(e)
            }
        })?;

        Ok(User {
            id: id.into(),
            username: user.username,
            email: user.email,
            is_admin: is_admin.into(),
        })
    }

    async fn user(&self, id: Uuid) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(DUuid::from(id))
        .fetch_optional(&**self)
        .await?;

        Ok(row.map(User::from))
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<StoredUser>> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&**self)
        .await?;

        Ok(row.map(StoredUser::from))
    }

    async fn count_users(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&**self)
            .await?;
        Ok(count as u64)
    }

    async fn grant_admin(&self, email: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "UPDATE users SET is_admin = $1 WHERE email = $2 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(DBool::from(true))
        .bind(email)
        .fetch_optional(&**self)
        .await?;

        Ok(row.map(User::from))
    }

    async fn insert_book(&self, book: NewBook) -> Result<Book> {
        let row: BookRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO books (id, title, author, description, image, average_rating)
            VALUES ($1, $2, $3, $4, $5, 0)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(DUuid::new())
        .bind(book.title)
        .bind(book.author)
        .bind(book.description)
        .bind(book.image)
        .fetch_one(&**self)
        .await?;

        Ok(row.into())
    }

    async fn book(&self, id: Uuid) -> Result<Option<Book>> {
        let row: Option<BookRow> = sqlx::query_as(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(DUuid::from(id))
        .fetch_optional(&**self)
        .await?;

        Ok(row.map(Book::from))
    }

    async fn list_books(&self) -> Result<Vec<Book>> {
        let rows: Vec<BookRow> = sqlx::query_as(&format!(
            "SELECT {} FROM books ORDER BY rowid ASC",
            BOOK_COLUMNS
        ))
        .fetch_all(&**self)
        .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn top_books(&self, limit: usize) -> Result<Vec<Book>> {
        let rows: Vec<BookRow> = sqlx::query_as(&format!(
            "SELECT {} FROM books ORDER BY average_rating DESC, rowid ASC LIMIT $1",
            BOOK_COLUMNS
        ))
        .bind(limit as i64)
        .fetch_all(&**self)
        .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn count_books(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&**self)
            .await?;
        Ok(count as u64)
    }

    async fn recompute_average(&self, book_id: Uuid) -> Result<f64> {
        // one statement, so the mean is taken over the reviews as they are
        //  at write time
        let average: Option<f64> = sqlx::query_scalar(
            r#"
            UPDATE books
            SET average_rating = (
                SELECT COALESCE(AVG(rating), 0.0) FROM reviews WHERE book_id = $1
            )
            WHERE id = $1
            RETURNING average_rating
            "#,
        )
        .bind(DUuid::from(book_id))
        .fetch_optional(&**self)
        .await?;

        Ok(average.unwrap_or(0.0))
    }

    async fn insert_review(&self, review: NewReview) -> Result<Review> {
        let row: ReviewRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO reviews (id, user_id, book_id, rating, review_text, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            REVIEW_COLUMNS
        ))
        .bind(DUuid::new())
        .bind(DUuid::from(review.user_id))
        .bind(DUuid::from(review.book_id))
        .bind(i64::from(review.rating))
        .bind(&review.review_text)
        .bind(review.created_at)
        .fetch_one(&**self)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Conflict(format!(
                    "user {} already reviewed book {}",
                    review.user_id, review.book_id
                ))
            } else {
                StoreError::Provider(e)
            }
        })?;

        decode_review(row)
    }

    async fn review(&self, id: Uuid) -> Result<Option<Review>> {
        let row: Option<ReviewRow> = sqlx::query_as(&format!(
            "SELECT {} FROM reviews WHERE id = $1",
            REVIEW_COLUMNS
        ))
        .bind(DUuid::from(id))
        .fetch_optional(&**self)
        .await?;

        row.map(decode_review).transpose()
    }

    async fn review_by(&self, user_id: Uuid, book_id: Uuid) -> Result<Option<Review>> {
        let row: Option<ReviewRow> = sqlx::query_as(&format!(
            "SELECT {} FROM reviews WHERE user_id = $1 AND book_id = $2",
            REVIEW_COLUMNS
        ))
        .bind(DUuid::from(user_id))
        .bind(DUuid::from(book_id))
        .fetch_optional(&**self)
        .await?;

        row.map(decode_review).transpose()
    }

    async fn reviews_for_book(&self, book_id: Uuid) -> Result<Vec<ReviewWithAuthor>> {
        let rows: Vec<ReviewWithAuthorRow> = sqlx::query_as(
            r#"
            SELECT r.id, r.user_id, u.username, r.book_id, r.rating, r.review_text, r.created_at
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            WHERE r.book_id = $1
            ORDER BY r.rowid ASC
            "#,
        )
        .bind(DUuid::from(book_id))
        .fetch_all(&**self)
        .await?;

        rows.into_iter().map(decode_review).collect()
    }

    async fn update_review(&self, id: Uuid, update: ReviewUpdate) -> Result<Option<Review>> {
        let row: Option<ReviewRow> = sqlx::query_as(&format!(
            r#"
            UPDATE reviews
            SET rating = COALESCE($1, rating),
                review_text = COALESCE($2, review_text)
            WHERE id = $3
            RETURNING {}
            "#,
            REVIEW_COLUMNS
        ))
        .bind(update.rating.map(i64::from))
        .bind(update.review_text)
        .bind(DUuid::from(id))
        .fetch_optional(&**self)
        .await?;

        row.map(decode_review).transpose()
    }

    async fn delete_review(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(DUuid::from(id))
            .execute(&**self)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_reviews(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
            .fetch_one(&**self)
            .await?;
        Ok(count as u64)
    }
}
