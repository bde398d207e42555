//! # Bootcamp Model
//!
//! The directory's root resource. The slug is derived from the name at
//! write time; the submitted address is geocoded into a location and never
//! stored itself. `average_cost` and `average_rating` are derived from the
//! bootcamp's courses and reviews and are recomputed on child mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{is_valid_email, is_valid_url};
use crate::store::Document;

/// Career tracks a bootcamp can teach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Career {
    #[serde(rename = "Web Development")]
    WebDevelopment,
    #[serde(rename = "Mobile Development")]
    MobileDevelopment,
    #[serde(rename = "UI/UX")]
    UiUx,
    #[serde(rename = "Data Science")]
    DataScience,
    Business,
    Other,
}

/// Geocoded point plus address parts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// GeoJSON type, always "Point"
    #[serde(rename = "type")]
    pub location_type: String,

    /// [longitude, latitude]
    pub coordinates: [f64; 2],

    pub formatted_address: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Bootcamp document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bootcamp {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub careers: Vec<Career>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_cost: Option<f64>,
    pub photo: String,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    /// Owning user
    pub user: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Document for Bootcamp {
    const RESOURCE: &'static str = "Bootcamp";

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
pub struct CreateBootcamp {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub careers: Vec<Career>,
    #[serde(default)]
    pub housing: bool,
    #[serde(default)]
    pub job_assistance: bool,
    #[serde(default)]
    pub job_guarantee: bool,
    #[serde(default)]
    pub accept_gi: bool,
}

impl CreateBootcamp {
    /// Validate the payload, collecting every failing message
    pub fn validate(&self) -> Vec<String> {
        let mut errors = validate_fields(
            &self.name,
            &self.description,
            self.website.as_deref(),
            self.phone.as_deref(),
            self.email.as_deref(),
            &self.careers,
        );
        if self.address.trim().is_empty() {
            errors.push("Please add an address".to_string());
        }
        errors
    }
}

/// Partial update payload; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBootcamp {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Re-geocodes the location when present
    pub address: Option<String>,
    pub careers: Option<Vec<Career>>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
}

impl Bootcamp {
    /// Re-run field validators after a partial update was applied
    pub fn validate(&self) -> Vec<String> {
        validate_fields(
            &self.name,
            &self.description,
            self.website.as_deref(),
            self.phone.as_deref(),
            self.email.as_deref(),
            &self.careers,
        )
    }
}

fn validate_fields(
    name: &str,
    description: &str,
    website: Option<&str>,
    phone: Option<&str>,
    email: Option<&str>,
    careers: &[Career],
) -> Vec<String> {
    let mut errors = Vec::new();

    if name.trim().is_empty() {
        errors.push("Please add a name".to_string());
    } else if name.len() > 50 {
        errors.push("Name can not be more than 50 characters".to_string());
    }

    if description.trim().is_empty() {
        errors.push("Please add a description".to_string());
    } else if description.len() > 500 {
        errors.push("Description can not be more than 500 characters".to_string());
    }

    if let Some(website) = website {
        if !is_valid_url(website) {
            errors.push("Please use a valid URL with HTTP or HTTPS".to_string());
        }
    }

    if let Some(phone) = phone {
        if phone.len() > 20 {
            errors.push("Phone number can not be longer than 20 characters".to_string());
        }
    }

    if let Some(email) = email {
        if !is_valid_email(email) {
            errors.push("Please add a valid email".to_string());
        }
    }

    if careers.is_empty() {
        errors.push("Please add at least one career".to_string());
    }

    errors
}

/// Derive a URL-safe slug from a bootcamp name
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
