//! # Bootcamp Service
//!
//! Create/update/delete with ownership checks, the one-bootcamp-per-publisher
//! rule, slug and location derivation, cascade delete, and the geo-radius
//! search.

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::api::{ApiError, ApiResult};
use crate::auth::{require_owner, require_role};
use crate::geo::{haversine_miles, Geocoder};
use crate::model::bootcamp::slugify;
use crate::model::{Bootcamp, CreateBootcamp, Role, UpdateBootcamp, User};
use crate::query::to_documents;
use crate::store::Db;

/// Create a bootcamp owned by the acting user.
///
/// Publishers get at most one; admins are unrestricted.
pub fn create(
    db: &Db,
    geocoder: &dyn Geocoder,
    actor: &User,
    payload: CreateBootcamp,
) -> ApiResult<Bootcamp> {
    require_role(actor, &[Role::Publisher, Role::Admin])?;

    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    if actor.role != Role::Admin && db.bootcamps.any(|b| b.user == actor.id)? {
        return Err(ApiError::bad_request(format!(
            "User {} has already published a bootcamp",
            actor.id
        )));
    }

    let location = geocoder.geocode(&payload.address)?;

    let bootcamp = Bootcamp {
        id: Uuid::new_v4(),
        slug: slugify(&payload.name),
        name: payload.name,
        description: payload.description,
        website: payload.website,
        phone: payload.phone,
        email: payload.email,
        location: Some(location),
        careers: payload.careers,
        average_rating: None,
        average_cost: None,
        photo: "no-photo.jpg".to_string(),
        housing: payload.housing,
        job_assistance: payload.job_assistance,
        job_guarantee: payload.job_guarantee,
        accept_gi: payload.accept_gi,
        user: actor.id,
        created_at: Utc::now(),
    };

    let name = bootcamp.name.clone();
    Ok(db
        .bootcamps
        .insert_unique(bootcamp, |existing| {
            (existing.name == name).then(|| ("name", name.clone()))
        })?)
}

/// Apply a partial update, re-running validators and re-deriving the slug
/// and location where the source fields changed
pub fn update(
    db: &Db,
    geocoder: &dyn Geocoder,
    actor: &User,
    id: Uuid,
    payload: UpdateBootcamp,
) -> ApiResult<Bootcamp> {
    let mut bootcamp = db.bootcamps.get_required(id)?;
    require_owner(actor, bootcamp.user, "update", "bootcamp")?;

    if let Some(name) = payload.name {
        if name != bootcamp.name && db.bootcamps.any(|b| b.name == name && b.id != id)? {
            return Err(ApiError::from(crate::store::StoreError::Duplicate {
                field: "name",
                value: name,
            }));
        }
        bootcamp.slug = slugify(&name);
        bootcamp.name = name;
    }
    if let Some(description) = payload.description {
        bootcamp.description = description;
    }
    if let Some(website) = payload.website {
        bootcamp.website = Some(website);
    }
    if let Some(phone) = payload.phone {
        bootcamp.phone = Some(phone);
    }
    if let Some(email) = payload.email {
        bootcamp.email = Some(email);
    }
    if let Some(address) = payload.address {
        bootcamp.location = Some(geocoder.geocode(&address)?);
    }
    if let Some(careers) = payload.careers {
        bootcamp.careers = careers;
    }
    if let Some(housing) = payload.housing {
        bootcamp.housing = housing;
    }
    if let Some(job_assistance) = payload.job_assistance {
        bootcamp.job_assistance = job_assistance;
    }
    if let Some(job_guarantee) = payload.job_guarantee {
        bootcamp.job_guarantee = job_guarantee;
    }
    if let Some(accept_gi) = payload.accept_gi {
        bootcamp.accept_gi = accept_gi;
    }

    let errors = bootcamp.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    Ok(db.bootcamps.replace(bootcamp)?)
}

/// Delete a bootcamp and cascade to its courses and reviews
pub fn delete(db: &Db, actor: &User, id: Uuid) -> ApiResult<Bootcamp> {
    let bootcamp = db.bootcamps.get_required(id)?;
    require_owner(actor, bootcamp.user, "delete", "bootcamp")?;

    let deleted = db.bootcamps.delete(id)?;

    match db.courses.delete_where(|course| course.bootcamp == id) {
        Ok(removed) if removed > 0 => {
            tracing::info!(bootcamp = %id, courses = removed, "cascade deleted courses");
        }
        Ok(_) => {}
        Err(err) => tracing::warn!(bootcamp = %id, error = %err, "course cascade failed"),
    }
    match db.reviews.delete_where(|review| review.bootcamp == id) {
        Ok(removed) if removed > 0 => {
            tracing::info!(bootcamp = %id, reviews = removed, "cascade deleted reviews");
        }
        Ok(_) => {}
        Err(err) => tracing::warn!(bootcamp = %id, error = %err, "review cascade failed"),
    }

    Ok(deleted)
}

/// Record the stored photo filename after a successful upload
pub fn set_photo(db: &Db, actor: &User, id: Uuid, filename: String) -> ApiResult<Bootcamp> {
    let bootcamp = db.bootcamps.get_required(id)?;
    require_owner(actor, bootcamp.user, "update", "bootcamp")?;
    Ok(db.bootcamps.update(id, |b| b.photo = filename)?)
}

/// Bootcamps within `distance` miles of the zipcode's location
pub fn within_radius(
    db: &Db,
    geocoder: &dyn Geocoder,
    zipcode: &str,
    distance: f64,
) -> ApiResult<Vec<Bootcamp>> {
    if !distance.is_finite() || distance < 0.0 {
        return Err(ApiError::bad_request("Please provide a valid distance"));
    }
    let center = geocoder.geocode(zipcode)?;

    Ok(db.bootcamps.filter(|bootcamp| {
        bootcamp
            .location
            .as_ref()
            .is_some_and(|location| {
                haversine_miles(location.coordinates, center.coordinates) <= distance
            })
    })?)
}

/// Inline each bootcamp's courses and reviews into its serialized form
pub fn expand(db: &Db, docs: &mut [Value]) -> ApiResult<()> {
    for doc in docs.iter_mut() {
        let Some(id) = doc.get("id").and_then(Value::as_str) else {
            continue;
        };
        let Ok(id) = Uuid::parse_str(id) else {
            continue;
        };

        let courses = db.courses.filter(|course| course.bootcamp == id)?;
        let reviews = db.reviews.filter(|review| review.bootcamp == id)?;

        if let Value::Object(map) = doc {
            map.insert(
                "courses".to_string(),
                Value::Array(to_documents(courses)?),
            );
            map.insert(
                "reviews".to_string(),
                Value::Array(to_documents(reviews)?),
            );
        }
    }
    Ok(())
}
