//! # Service Layer
//!
//! Domain orchestration around the storage calls. Everything the data model
//! derives (slugs, locations, aggregates) is an explicit step here so
//! ordering and failure handling stay visible: no implicit model hooks.

pub mod auth;
pub mod bootcamps;
pub mod courses;
pub mod reviews;
pub mod seed;
pub mod users;
