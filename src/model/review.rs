//! # Review Model
//!
//! Reviews belong to a bootcamp and are authored by a user; a user may
//! review a given bootcamp at most once. Ratings feed the bootcamp's
//! `average_rating` derived field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Document;

/// Review document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    /// 1 to 10
    pub rating: f64,
    /// Parent bootcamp
    pub bootcamp: Uuid,
    /// Authoring user
    pub user: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Document for Review {
    const RESOURCE: &'static str = "Review";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Create payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReview {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl CreateReview {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = validate_title_and_text(&self.title, &self.text);
        match self.rating {
            Some(rating) if (1.0..=10.0).contains(&rating) => {}
            Some(_) => errors.push("Rating must be between 1 and 10".to_string()),
            None => errors.push("Please add a rating between 1 and 10".to_string()),
        }
        errors
    }
}

/// Partial update payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReview {
    pub title: Option<String>,
    pub text: Option<String>,
    pub rating: Option<f64>,
}

impl Review {
    /// Re-run field validators after a partial update was applied
    pub fn validate(&self) -> Vec<String> {
        let mut errors = validate_title_and_text(&self.title, &self.text);
        if !(1.0..=10.0).contains(&self.rating) {
            errors.push("Rating must be between 1 and 10".to_string());
        }
        errors
    }
}

fn validate_title_and_text(title: &str, text: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if title.trim().is_empty() {
        errors.push("Please add a title for the review".to_string());
    } else if title.len() > 50 {
        errors.push("Title can not be more than 50 characters".to_string());
    }
    if text.trim().is_empty() {
        errors.push("Please add review content".to_string());
    } else if text.len() > 500 {
        errors.push("Review content can not be more than 500 characters".to_string());
    }
    errors
}
