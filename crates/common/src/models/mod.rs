//! Domain records shared by every layer of the service.
//!
//! Serialization follows the public JSON contract of the API: identifiers
//! are written as `_id` and field names are camelCase.

mod book;
mod rating;
mod review;
mod user;

pub use book::{AdminStats, Book, BookDetail, NewBook};
pub use rating::{Rating, RatingError};
pub use review::{NewReview, Review, ReviewAuthor, ReviewUpdate, ReviewWithAuthor};
pub use user::{NewUser, StoredUser, User};
