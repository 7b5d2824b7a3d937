//! API Module
//!
//! HTTP handlers and routing for the roster REST API.
//!
//! # Endpoints
//! - `/classes` and `/classes/:id` - Class CRUD
//! - `/students` and `/students/:id` - Student CRUD
//! - `GET /health` - Health check with cache counters

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
