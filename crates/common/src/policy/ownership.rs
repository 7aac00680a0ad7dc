use crate::models::{Rating, Review, ReviewUpdate, User};

use super::PolicyError;

/// Unvalidated input for a new review.
#[derive(Debug, Clone, Default)]
pub struct ReviewDraft {
    pub rating: Option<i64>,
    pub review_text: Option<String>,
}

/// Unvalidated input for a review update; absent fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct ReviewChanges {
    pub rating: Option<i64>,
    pub review_text: Option<String>,
}

fn rating(value: i64) -> Result<Rating, PolicyError> {
    Rating::new(value).map_err(|e| PolicyError::Invalid(e.to_string()))
}

pub fn validate_draft(draft: ReviewDraft) -> Result<(Rating, String), PolicyError> {
    let (Some(value), Some(text)) = (draft.rating, draft.review_text) else {
        return Err(PolicyError::Invalid(
            "Rating and review text are required.".to_string(),
        ));
    };
    if text.trim().is_empty() {
        return Err(PolicyError::Invalid(
            "Rating and review text are required.".to_string(),
        ));
    }

    Ok((rating(value)?, text))
}

pub fn validate_changes(changes: ReviewChanges) -> Result<ReviewUpdate, PolicyError> {
    if changes.rating.is_none() && changes.review_text.is_none() {
        return Err(PolicyError::Invalid(
            "At least one of rating or reviewText is required for update.".to_string(),
        ));
    }

    let rating = changes.rating.map(rating).transpose()?;
    if let Some(text) = &changes.review_text {
        if text.trim().is_empty() {
            return Err(PolicyError::Invalid(
                "Review text cannot be empty.".to_string(),
            ));
        }
    }

    Ok(ReviewUpdate {
        rating,
        review_text: changes.review_text,
    })
}

/// Only the author may edit a review.
pub fn authorize_update(review: &Review, actor: &User) -> Result<(), PolicyError> {
    if review.user_id == actor.id {
        Ok(())
    } else {
        Err(PolicyError::Forbidden(
            "You are not authorized to update this review.".to_string(),
        ))
    }
}

/// The author or any administrator may delete a review.
pub fn authorize_delete(review: &Review, actor: &User) -> Result<(), PolicyError> {
    if review.user_id == actor.id || actor.is_admin {
        Ok(())
    } else {
        Err(PolicyError::Forbidden(
            "You are not authorized to delete this review.".to_string(),
        ))
    }
}
