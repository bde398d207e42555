//! # Seed Loading
//!
//! Loads a JSON fixture file into the store at startup. Seeding goes
//! through the regular services so fixtures are validated, owned, and
//! aggregated exactly like API writes.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::api::ApiError;
use crate::geo::Geocoder;
use crate::model::user::RegisterRequest;
use crate::model::{CreateBootcamp, CreateCourse, CreateReview, Role};
use crate::store::Db;

/// Seed loading errors
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Seed rejected: {0}")]
    Rejected(#[from] ApiError),

    #[error("Seed references unknown user: {0}")]
    UnknownUser(String),
}

/// Fixture file shape
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub bootcamps: Vec<SeedBootcamp>,
}

#[derive(Debug, Deserialize)]
pub struct SeedUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct SeedBootcamp {
    /// Email of the owning user, which must appear in `users`
    pub owner: String,
    #[serde(flatten)]
    pub bootcamp: CreateBootcamp,
    #[serde(default)]
    pub courses: Vec<CreateCourse>,
    #[serde(default)]
    pub reviews: Vec<SeedReview>,
}

#[derive(Debug, Deserialize)]
pub struct SeedReview {
    /// Email of the reviewing user
    pub reviewer: String,
    #[serde(flatten)]
    pub review: CreateReview,
}

/// Counts of what was loaded
#[derive(Debug, Default)]
pub struct SeedSummary {
    pub users: usize,
    pub bootcamps: usize,
    pub courses: usize,
    pub reviews: usize,
}

/// Load a fixture file into the store
pub fn load(db: &Db, geocoder: &dyn Geocoder, path: &Path) -> Result<SeedSummary, SeedError> {
    let text = std::fs::read_to_string(path)?;
    let file: SeedFile = serde_json::from_str(&text)?;
    load_parsed(db, geocoder, file)
}

fn load_parsed(
    db: &Db,
    geocoder: &dyn Geocoder,
    file: SeedFile,
) -> Result<SeedSummary, SeedError> {
    let mut summary = SeedSummary::default();
    let mut users_by_email: HashMap<String, Uuid> = HashMap::new();

    for seed_user in file.users {
        let user = super::auth::register(
            db,
            RegisterRequest {
                name: seed_user.name,
                email: seed_user.email,
                password: seed_user.password,
                role: seed_user.role,
            },
        )?;
        users_by_email.insert(user.email.clone(), user.id);
        summary.users += 1;
    }

    for seed_bootcamp in file.bootcamps {
        let owner = lookup(db, &users_by_email, &seed_bootcamp.owner)?;
        let bootcamp = super::bootcamps::create(db, geocoder, &owner, seed_bootcamp.bootcamp)?;
        summary.bootcamps += 1;

        for course in seed_bootcamp.courses {
            super::courses::create(db, &owner, bootcamp.id, course)?;
            summary.courses += 1;
        }

        for seed_review in seed_bootcamp.reviews {
            let reviewer = lookup(db, &users_by_email, &seed_review.reviewer)?;
            super::reviews::create(db, &reviewer, bootcamp.id, seed_review.review)?;
            summary.reviews += 1;
        }
    }

    Ok(summary)
}

fn lookup(
    db: &Db,
    users_by_email: &HashMap<String, Uuid>,
    email: &str,
) -> Result<crate::model::User, SeedError> {
    let id = users_by_email
        .get(email)
        .ok_or_else(|| SeedError::UnknownUser(email.to_string()))?;
    db.users
        .get(*id)
        .map_err(|err| SeedError::Rejected(err.into()))?
        .ok_or_else(|| SeedError::UnknownUser(email.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::OfflineGeocoder;

    const FIXTURE: &str = r#"{
        "users": [
            {"name": "Pat Publisher", "email": "pat@devworks.com", "password": "123456", "role": "publisher"},
            {"name": "Rae Reviewer", "email": "rae@gmail.com", "password": "123456"}
        ],
        "bootcamps": [
            {
                "owner": "pat@devworks.com",
                "name": "Devworks Bootcamp",
                "description": "Full stack development",
                "address": "233 Bay State Rd Boston MA 02215",
                "careers": ["Web Development"],
                "courses": [
                    {"title": "Front End", "description": "HTML and CSS", "weeks": "8",
                     "tuition": 8000, "minimumSkill": "beginner"},
                    {"title": "Back End", "description": "APIs", "weeks": "10",
                     "tuition": 10000, "minimumSkill": "intermediate"}
                ],
                "reviews": [
                    {"reviewer": "rae@gmail.com", "title": "Great", "text": "Loved it", "rating": 9}
                ]
            }
        ]
    }"#;

    #[test]
    fn test_seed_loads_through_services() {
        let db = Db::new();
        let file: SeedFile = serde_json::from_str(FIXTURE).unwrap();

        let summary = load_parsed(&db, &OfflineGeocoder::new(), file).unwrap();
        assert_eq!(summary.users, 2);
        assert_eq!(summary.bootcamps, 1);
        assert_eq!(summary.courses, 2);
        assert_eq!(summary.reviews, 1);

        // Aggregates were recomputed along the way
        let bootcamp = db.bootcamps.all().unwrap().remove(0);
        assert_eq!(bootcamp.average_cost, Some(9000.0));
        assert_eq!(bootcamp.average_rating, Some(9.0));
    }

    #[test]
    fn test_unknown_owner_is_rejected() {
        let db = Db::new();
        let file: SeedFile = serde_json::from_str(
            r#"{"bootcamps": [{"owner": "ghost@x.dev", "name": "X", "description": "Y",
                "address": "Z 12345", "careers": ["Other"]}]}"#,
        )
        .unwrap();

        let err = load_parsed(&db, &OfflineGeocoder::new(), file).unwrap_err();
        assert!(matches!(err, SeedError::UnknownUser(email) if email == "ghost@x.dev"));
    }
}
