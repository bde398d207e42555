//! # Review Service
//!
//! CRUD with authorship checks, the one-review-per-user-per-bootcamp
//! constraint, and the `average_rating` recomputation that follows every
//! review mutation (fire-and-forget, failures logged).

use chrono::Utc;
use uuid::Uuid;

use crate::api::{ApiError, ApiResult};
use crate::auth::{require_owner, require_role};
use crate::model::{CreateReview, Review, Role, UpdateReview, User};
use crate::store::{Db, StoreResult};

pub use crate::service::courses::expand_bootcamp;

/// Create a review under a bootcamp.
///
/// Publishers cannot review; a user reviews a given bootcamp at most once.
pub fn create(db: &Db, actor: &User, bootcamp_id: Uuid, payload: CreateReview) -> ApiResult<Review> {
    require_role(actor, &[Role::User, Role::Admin])?;

    db.bootcamps.get_required(bootcamp_id)?;

    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let review = Review {
        id: Uuid::new_v4(),
        title: payload.title,
        text: payload.text,
        // Validated Some above
        rating: payload.rating.unwrap_or_default(),
        bootcamp: bootcamp_id,
        user: actor.id,
        created_at: Utc::now(),
    };

    let actor_id = actor.id;
    let review = db.reviews.insert_unique(review, |existing| {
        (existing.bootcamp == bootcamp_id && existing.user == actor_id).then(|| {
            (
                "review",
                format!("user {} has already reviewed this bootcamp", actor_id),
            )
        })
    })?;

    recompute_or_log(db, bootcamp_id);
    Ok(review)
}

/// Apply a partial update, re-running validators
pub fn update(db: &Db, actor: &User, id: Uuid, payload: UpdateReview) -> ApiResult<Review> {
    let mut review = db.reviews.get_required(id)?;
    require_owner(actor, review.user, "update", "review")?;

    if let Some(title) = payload.title {
        review.title = title;
    }
    if let Some(text) = payload.text {
        review.text = text;
    }
    if let Some(rating) = payload.rating {
        review.rating = rating;
    }

    let errors = review.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let bootcamp_id = review.bootcamp;
    let review = db.reviews.replace(review)?;
    recompute_or_log(db, bootcamp_id);
    Ok(review)
}

/// Delete a review and refresh the parent's average rating
pub fn delete(db: &Db, actor: &User, id: Uuid) -> ApiResult<Review> {
    let review = db.reviews.get_required(id)?;
    require_owner(actor, review.user, "delete", "review")?;

    let deleted = db.reviews.delete(id)?;
    recompute_or_log(db, deleted.bootcamp);
    Ok(deleted)
}

fn recompute_or_log(db: &Db, bootcamp_id: Uuid) {
    if let Err(err) = recompute_average_rating(db, bootcamp_id) {
        tracing::warn!(bootcamp = %bootcamp_id, error = %err, "average rating recomputation failed");
    }
}

/// Mean rating across the bootcamp's reviews, rounded to one decimal.
/// Cleared when the last review goes.
pub fn recompute_average_rating(db: &Db, bootcamp_id: Uuid) -> StoreResult<()> {
    let ratings: Vec<f64> = db
        .reviews
        .filter(|review| review.bootcamp == bootcamp_id)?
        .iter()
        .map(|review| review.rating)
        .collect();

    let average = if ratings.is_empty() {
        None
    } else {
        let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    };

    db.bootcamps
        .update(bootcamp_id, |bootcamp| bootcamp.average_rating = average)?;
    Ok(())
}
