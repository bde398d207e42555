//! # Resource Models
//!
//! Typed documents for the four collections, their closed enums, and
//! per-field validation. Validation collects every failing message so a
//! single 400 can report them all at once.

pub mod bootcamp;
pub mod course;
pub mod review;
pub mod user;

pub use bootcamp::{Bootcamp, Career, CreateBootcamp, Location, UpdateBootcamp};
pub use course::{Course, CreateCourse, MinimumSkill, UpdateCourse};
pub use review::{CreateReview, Review, UpdateReview};
pub use user::{Role, User};

use std::sync::OnceLock;

use regex::Regex;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static URL_RE: OnceLock<Regex> = OnceLock::new();

/// Loose RFC-style email shape check
pub fn is_valid_email(value: &str) -> bool {
    let re = EMAIL_RE.get_or_init(|| {
        Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,})+$").expect("email regex")
    });
    re.is_match(value)
}

/// HTTP or HTTPS URL shape check
pub fn is_valid_url(value: &str) -> bool {
    let re = URL_RE.get_or_init(|| {
        Regex::new(r"^https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_+.~#?&/=]*)$")
            .expect("url regex")
    });
    re.is_match(value)
}
