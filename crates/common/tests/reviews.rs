//! Integration tests for review ownership and rating aggregation

mod common;

use ::common::error::ErrorKind;
use ::common::policy::{ReviewChanges, ReviewDraft};
use ::common::store::CatalogStore;
use std::sync::Arc;
use tokio::sync::Barrier;
use uuid::Uuid;

use crate::common::{RecomputeHold, SteppedStore};

fn draft(rating: i64, text: &str) -> ReviewDraft {
    ReviewDraft {
        rating: Some(rating),
        review_text: Some(text.to_string()),
    }
}

fn new_rating(rating: i64) -> ReviewChanges {
    ReviewChanges {
        rating: Some(rating),
        review_text: None,
    }
}

#[tokio::test]
async fn test_review_lifecycle_tracks_average() {
    let catalog = common::setup_catalog();
    let admin = common::register_admin(&catalog, "admin").await;
    let reader = common::register(&catalog, "reader").await;
    let book = common::add_book(&catalog, &admin, "Dune").await;
    assert_eq!(book.average_rating, 0.0);

    let review = catalog
        .create_review(&reader, book.id, draft(4, "Spice!"))
        .await
        .unwrap();
    assert_eq!(review.user_id, reader.id);
    assert_eq!(review.book_id, book.id);
    let detail = catalog.book_detail(book.id).await.unwrap();
    assert_eq!(detail.book.average_rating, 4.0);
    assert_eq!(detail.reviews.len(), 1);
    assert_eq!(detail.reviews[0].user.username, "reader");

    let err = catalog
        .create_review(&reader, book.id, draft(5, "Again"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invalid);
    assert_eq!(err.to_string(), "You have already reviewed this book.");
    assert_eq!(catalog.store().count_reviews().await.unwrap(), 1);

    let updated = catalog
        .update_review(&reader, review.id, new_rating(2))
        .await
        .unwrap();
    assert_eq!(updated.rating.get(), 2);
    assert_eq!(updated.review_text, "Spice!");
    let detail = catalog.book_detail(book.id).await.unwrap();
    assert_eq!(detail.book.average_rating, 2.0);

    catalog.delete_review(&reader, review.id).await.unwrap();
    let detail = catalog.book_detail(book.id).await.unwrap();
    assert_eq!(detail.book.average_rating, 0.0);
    assert!(detail.reviews.is_empty());
}

#[tokio::test]
async fn test_average_over_several_reviewers() {
    let catalog = common::setup_catalog();
    let admin = common::register_admin(&catalog, "admin").await;
    let book = common::add_book(&catalog, &admin, "Emma").await;

    for (name, rating) in [("a", 5), ("b", 4), ("c", 4)] {
        let user = common::register(&catalog, name).await;
        catalog
            .create_review(&user, book.id, draft(rating, "ok"))
            .await
            .unwrap();
    }

    let detail = catalog.book_detail(book.id).await.unwrap();
    assert!((detail.book.average_rating - 13.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_review_validation() {
    let catalog = common::setup_catalog();
    let admin = common::register_admin(&catalog, "admin").await;
    let reader = common::register(&catalog, "reader").await;
    let book = common::add_book(&catalog, &admin, "Dune").await;

    let err = catalog
        .create_review(&reader, book.id, draft(6, "too good"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Rating must be between 1 and 5.");

    let err = catalog
        .create_review(&reader, book.id, ReviewDraft::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Rating and review text are required.");

    let err = catalog
        .create_review(&reader, Uuid::new_v4(), draft(3, "where"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "Book not found");

    let review = catalog
        .create_review(&reader, book.id, draft(3, "fine"))
        .await
        .unwrap();
    let err = catalog
        .update_review(&reader, review.id, ReviewChanges::default())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "At least one of rating or reviewText is required for update."
    );

    for rating in [0, 6] {
        let err = catalog
            .update_review(&reader, review.id, new_rating(rating))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
        assert_eq!(err.to_string(), "Rating must be between 1 and 5.");
    }

    // rejected updates leave the review and the average untouched
    let stored = catalog.store().review(review.id).await.unwrap().unwrap();
    assert_eq!(stored.rating.get(), 3);
    let detail = catalog.book_detail(book.id).await.unwrap();
    assert_eq!(detail.book.average_rating, 3.0);
}

#[tokio::test]
async fn test_only_author_updates() {
    let catalog = common::setup_catalog();
    let admin = common::register_admin(&catalog, "admin").await;
    let author = common::register(&catalog, "author").await;
    let other = common::register(&catalog, "other").await;
    let book = common::add_book(&catalog, &admin, "Dune").await;

    let review = catalog
        .create_review(&author, book.id, draft(5, "mine"))
        .await
        .unwrap();

    for actor in [&other, &admin] {
        let err = catalog
            .update_review(actor, review.id, new_rating(1))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert_eq!(err.to_string(), "You are not authorized to update this review.");
    }

    let detail = catalog.book_detail(book.id).await.unwrap();
    assert_eq!(detail.book.average_rating, 5.0);
}

#[tokio::test]
async fn test_author_or_admin_deletes() {
    let catalog = common::setup_catalog();
    let admin = common::register_admin(&catalog, "admin").await;
    let author = common::register(&catalog, "author").await;
    let other = common::register(&catalog, "other").await;
    let book = common::add_book(&catalog, &admin, "Dune").await;

    let review = catalog
        .create_review(&author, book.id, draft(5, "mine"))
        .await
        .unwrap();

    let err = catalog.delete_review(&other, review.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert_eq!(err.to_string(), "You are not authorized to delete this review.");

    catalog.delete_review(&admin, review.id).await.unwrap();
    let err = catalog.delete_review(&admin, review.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_racing_reviews_store_one() {
    // both submissions pass the duplicate pre-check before either inserts
    let store = SteppedStore {
        pre_check: Some(Arc::new(Barrier::new(2))),
        ..Default::default()
    };
    let catalog = common::catalog_over(store);
    let admin = common::register_admin(&catalog, "admin").await;
    let reader = common::register(&catalog, "reader").await;
    let book_id = common::add_book(&catalog, &admin, "Dune").await.id;

    let submit = |rating: i64, text: &'static str| {
        let catalog = catalog.clone();
        let reader = reader.clone();
        tokio::spawn(async move {
            catalog
                .create_review(&reader, book_id, draft(rating, text))
                .await
        })
    };
    let (a, b) = (submit(5, "first"), submit(1, "second"));
    let results = [a.await.unwrap(), b.await.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let err = results.into_iter().find_map(Result::err).unwrap();
    assert_eq!(err.kind(), ErrorKind::Invalid);
    assert_eq!(err.to_string(), "You have already reviewed this book.");
    assert_eq!(catalog.store().count_reviews().await.unwrap(), 1);
}

#[tokio::test]
async fn test_interleaved_reviews_keep_exact_average() {
    let hold = Arc::new(RecomputeHold::default());
    let store = SteppedStore {
        hold: Some(hold.clone()),
        ..Default::default()
    };
    let catalog = common::catalog_over(store);
    let admin = common::register_admin(&catalog, "admin").await;
    let first = common::register(&catalog, "first").await;
    let second = common::register(&catalog, "second").await;
    let book_id = common::add_book(&catalog, &admin, "Dune").await.id;

    // the first review's recompute finishes last
    let held = {
        let catalog = catalog.clone();
        tokio::spawn(async move {
            catalog
                .create_review(&first, book_id, draft(5, "great"))
                .await
        })
    };
    hold.written.notified().await;

    catalog
        .create_review(&second, book_id, draft(1, "dull"))
        .await
        .unwrap();
    hold.release.notify_one();
    held.await.unwrap().unwrap();

    let detail = catalog.book_detail(book_id).await.unwrap();
    assert_eq!(detail.reviews.len(), 2);
    assert_eq!(detail.book.average_rating, 3.0);
}
