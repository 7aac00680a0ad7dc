use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ReviewWithAuthor;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,
    /// URL of the cover image
    pub image: String,
    /// Mean of the book's review ratings, 0 when it has none.
    ///  Only ever written by the rating aggregator.
    pub average_rating: f64,
}

#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDetail {
    pub book: Book,
    pub reviews: Vec<ReviewWithAuthor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: u64,
    pub total_books: u64,
    pub total_reviews: u64,
    pub top_books: Vec<Book>,
}
