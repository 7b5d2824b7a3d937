//! Service Module
//!
//! The class and student managers and the cache coordinator they share.

mod class;
mod coordinator;
mod student;

pub use class::ClassManager;
pub use coordinator::CacheCoordinator;
pub use student::StudentManager;
