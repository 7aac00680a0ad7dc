/**
 * Credential primitives.
 *  - bcrypt password hashing
 *  - Signed, expiring bearer tokens
 */
pub mod auth;
/**
 * The service itself: registration, login,
 *  books, reviews and admin statistics,
 *  expressed over any catalog store.
 */
pub mod catalog;
pub mod error;
/**
 * Domain records and their JSON shape.
 */
pub mod models;
/**
 * Pure access and ownership rules.
 * Decides whether a caller may act on a
 *  record, and whether review input is valid.
 */
pub mod policy;
/**
 * Average rating aggregation.
 */
pub mod rating;
/**
 * Persistence boundary for users, books and
 *  reviews, with an in-memory implementation.
 */
pub mod store;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::auth::{TokenIssuer, DEFAULT_COST};
    pub use crate::catalog::{BookDraft, Catalog, Registration, Session};
    pub use crate::error::{CatalogError, ErrorKind};
    pub use crate::models::{Book, BookDetail, Rating, Review, ReviewWithAuthor, User};
    pub use crate::policy::{ReviewChanges, ReviewDraft};
    pub use crate::store::{CatalogStore, MemoryCatalogStore, StoreError};
    pub use crate::version::build_info;
}
