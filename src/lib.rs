//! Class Roster - class and student enrollment API
//!
//! CRUD over classes and students with a capacity limit per class, served
//! from a backing store through a read-through TTL cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
