//! # HTTP Layer
//!
//! Routers, handlers, shared state, and the global request middlewares.

pub mod auth_routes;
pub mod bootcamp_routes;
pub mod course_routes;
pub mod json;
pub mod rate_limit;
pub mod review_routes;
pub mod server;
pub mod state;
pub mod user_routes;

pub use server::{build_router, serve};
pub use state::AppState;
