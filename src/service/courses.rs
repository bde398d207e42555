//! # Course Service
//!
//! CRUD with ownership checks against the parent bootcamp, plus the
//! `average_cost` recomputation that follows every course mutation. The
//! recomputation is fire-and-forget relative to the triggering write:
//! its failure is logged, never surfaced to the caller.

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::api::{ApiError, ApiResult};
use crate::auth::{require_owner, require_role};
use crate::model::{Course, CreateCourse, Role, UpdateCourse, User};
use crate::store::{Db, StoreResult};

/// Create a course under a bootcamp.
///
/// The parent must exist and the actor must own it (or be admin).
pub fn create(db: &Db, actor: &User, bootcamp_id: Uuid, payload: CreateCourse) -> ApiResult<Course> {
    require_role(actor, &[Role::Publisher, Role::Admin])?;

    let bootcamp = db.bootcamps.get_required(bootcamp_id)?;
    require_owner(actor, bootcamp.user, "add a course to", "bootcamp")?;

    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let course = Course {
        id: Uuid::new_v4(),
        title: payload.title,
        description: payload.description,
        weeks: payload.weeks,
        // Validated Some above
        tuition: payload.tuition.unwrap_or_default(),
        minimum_skill: payload.minimum_skill.unwrap_or(crate::model::MinimumSkill::Beginner),
        scholarships_available: payload.scholarships_available,
        bootcamp: bootcamp_id,
        user: actor.id,
        created_at: Utc::now(),
    };

    let course = db.courses.insert(course)?;
    recompute_or_log(db, bootcamp_id);
    Ok(course)
}

/// Apply a partial update, re-running validators
pub fn update(db: &Db, actor: &User, id: Uuid, payload: UpdateCourse) -> ApiResult<Course> {
    let mut course = db.courses.get_required(id)?;
    require_owner(actor, course.user, "update", "course")?;

    if let Some(title) = payload.title {
        course.title = title;
    }
    if let Some(description) = payload.description {
        course.description = description;
    }
    if let Some(weeks) = payload.weeks {
        course.weeks = weeks;
    }
    if let Some(tuition) = payload.tuition {
        course.tuition = tuition;
    }
    if let Some(minimum_skill) = payload.minimum_skill {
        course.minimum_skill = minimum_skill;
    }
    if let Some(scholarships_available) = payload.scholarships_available {
        course.scholarships_available = scholarships_available;
    }

    let errors = course.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let bootcamp_id = course.bootcamp;
    let course = db.courses.replace(course)?;
    recompute_or_log(db, bootcamp_id);
    Ok(course)
}

/// Delete a course and refresh the parent's average cost
pub fn delete(db: &Db, actor: &User, id: Uuid) -> ApiResult<Course> {
    let course = db.courses.get_required(id)?;
    require_owner(actor, course.user, "delete", "course")?;

    let deleted = db.courses.delete(id)?;
    recompute_or_log(db, deleted.bootcamp);
    Ok(deleted)
}

fn recompute_or_log(db: &Db, bootcamp_id: Uuid) {
    if let Err(err) = recompute_average_cost(db, bootcamp_id) {
        tracing::warn!(bootcamp = %bootcamp_id, error = %err, "average cost recomputation failed");
    }
}

/// Average tuition across the bootcamp's courses, ceiling to the nearest 10.
/// Cleared when the last course goes.
pub fn recompute_average_cost(db: &Db, bootcamp_id: Uuid) -> StoreResult<()> {
    let tuitions: Vec<f64> = db
        .courses
        .filter(|course| course.bootcamp == bootcamp_id)?
        .iter()
        .map(|course| course.tuition)
        .collect();

    let average = if tuitions.is_empty() {
        None
    } else {
        let mean = tuitions.iter().sum::<f64>() / tuitions.len() as f64;
        Some((mean / 10.0).ceil() * 10.0)
    };

    db.bootcamps
        .update(bootcamp_id, |bootcamp| bootcamp.average_cost = average)?;
    Ok(())
}

/// Replace each course's bootcamp id with a restricted field set of the
/// parent document
pub fn expand_bootcamp(db: &Db, docs: &mut [Value]) -> ApiResult<()> {
    for doc in docs.iter_mut() {
        let Some(parent_id) = doc.get("bootcamp").and_then(Value::as_str) else {
            continue;
        };
        let Ok(parent_id) = Uuid::parse_str(parent_id) else {
            continue;
        };
        if let Some(bootcamp) = db.bootcamps.get(parent_id)? {
            if let Value::Object(map) = doc {
                map.insert(
                    "bootcamp".to_string(),
                    serde_json::json!({
                        "id": bootcamp.id,
                        "name": bootcamp.name,
                        "description": bootcamp.description,
                    }),
                );
            }
        }
    }
    Ok(())
}
