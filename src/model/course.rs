//! # Course Model
//!
//! Courses belong to a bootcamp. Their tuition feeds the bootcamp's
//! `average_cost` derived field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Document;

/// Minimum skill level required to enroll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinimumSkill {
    Beginner,
    Intermediate,
    Advanced,
}

/// Course document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Duration in weeks, kept as free text ("8", "6-8")
    pub weeks: String,
    pub tuition: f64,
    pub minimum_skill: MinimumSkill,
    pub scholarships_available: bool,
    /// Parent bootcamp
    pub bootcamp: Uuid,
    /// Owning user
    pub user: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Document for Course {
    const RESOURCE: &'static str = "Course";

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
pub struct CreateCourse {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub weeks: String,
    #[serde(default)]
    pub tuition: Option<f64>,
    pub minimum_skill: Option<MinimumSkill>,
    #[serde(default)]
    pub scholarships_available: bool,
}

impl CreateCourse {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push("Please add a course title".to_string());
        }
        if self.description.trim().is_empty() {
            errors.push("Please add a description".to_string());
        }
        if self.weeks.trim().is_empty() {
            errors.push("Please add number of weeks".to_string());
        }
        match self.tuition {
            Some(tuition) if tuition >= 0.0 => {}
            _ => errors.push("Please add a tuition cost".to_string()),
        }
        if self.minimum_skill.is_none() {
            errors.push("Please add a minimum skill".to_string());
        }
        errors
    }
}

/// Partial update payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub weeks: Option<String>,
    pub tuition: Option<f64>,
    pub minimum_skill: Option<MinimumSkill>,
    pub scholarships_available: Option<bool>,
}

impl Course {
    /// Re-run field validators after a partial update was applied
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push("Please add a course title".to_string());
        }
        if self.description.trim().is_empty() {
            errors.push("Please add a description".to_string());
        }
        if self.weeks.trim().is_empty() {
            errors.push("Please add number of weeks".to_string());
        }
        if self.tuition < 0.0 {
            errors.push("Please add a tuition cost".to_string());
        }
        errors
    }
}
