//! Average rating aggregation.
//!
//! A book's `average_rating` is derived data. It is recomputed from the
//!  full set of the book's reviews after every review create, update and
//!  delete, so the stored value is always the exact mean.

use uuid::Uuid;

use crate::models::Rating;
use crate::store::{CatalogStore, StoreError};

/// Arithmetic mean of `ratings`, or `0.0` when there are none.
pub fn average(ratings: &[Rating]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }

    let sum: u64 = ratings.iter().map(|r| r.get() as u64).sum();
    sum as f64 / ratings.len() as f64
}

/// Rescan the reviews of `book_id` and store their mean on the book.
///
/// The store performs the scan and the write in one step; the last
///  recompute to run therefore always reflects every committed review.
pub async fn recompute<S: CatalogStore>(
    store: &S,
    book_id: Uuid,
) -> Result<f64, StoreError<S::Error>> {
    let avg = store.recompute_average(book_id).await?;

    tracing::debug!(book_id = %book_id, average = avg, "recomputed average rating");

    Ok(avg)
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;
    use crate::models::{NewBook, NewReview, NewUser};
    use crate::store::MemoryCatalogStore;

    fn ratings(values: &[i64]) -> Vec<Rating> {
        values.iter().map(|v| Rating::new(*v).unwrap()).collect()
    }

    #[test]
    fn test_average_empty_is_zero() {
        assert_eq!(average(&[]), 0.0);
    }

    #[test]
    fn test_average_is_exact_mean() {
        assert_eq!(average(&ratings(&[4])), 4.0);
        assert_eq!(average(&ratings(&[1, 2])), 1.5);
        assert!((average(&ratings(&[5, 4, 4])) - 13.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_recompute_writes_book() {
        let store = MemoryCatalogStore::new();
        let book = store
            .insert_book(NewBook {
                title: "Emma".to_string(),
                author: "Jane Austen".to_string(),
                description: "A novel".to_string(),
                image: "/images/books/emma.jpg".to_string(),
            })
            .await
            .unwrap();

        for (i, rating) in [5, 2].into_iter().enumerate() {
            let user = store
                .insert_user(NewUser {
                    username: format!("reader{}", i),
                    email: format!("reader{}@example.com", i),
                    password_hash: "hash".to_string(),
                })
                .await
                .unwrap();
            store
                .insert_review(NewReview {
                    user_id: user.id,
                    book_id: book.id,
                    rating: Rating::new(rating).unwrap(),
                    review_text: "text".to_string(),
                    created_at: OffsetDateTime::now_utc(),
                })
                .await
                .unwrap();
        }

        let avg = recompute(&store, book.id).await.unwrap();
        assert_eq!(avg, 3.5);
        let stored = store.book(book.id).await.unwrap().unwrap();
        assert_eq!(stored.average_rating, 3.5);
    }
}
