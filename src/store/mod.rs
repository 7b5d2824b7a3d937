//! Backing Store Module
//!
//! The store is the single source of truth for classes and students and
//! owns referential integrity: deleting a class nulls its students'
//! `class_id`, and every write that could break the capacity invariant is a
//! conditional write that re-checks it atomically.

mod memory;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{Class, ClassChanges, NewClass, NewStudent, Student, StudentChanges};

pub use memory::MemoryStore;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistence contract used by the managers.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_class(&self, new: NewClass) -> StoreResult<Class>;

    /// Class with its enrolled students, or `None`.
    async fn find_class(&self, id: u64) -> StoreResult<Option<Class>>;

    /// Every class with its enrolled students, ordered by id.
    async fn list_classes(&self) -> StoreResult<Vec<Class>>;

    /// Replaces name, teacher and capacity.
    ///
    /// Fails with [`StoreError::CapacityBelowEnrollment`] when the new
    /// capacity is below the enrollment at the moment of the write.
    async fn update_class(&self, id: u64, changes: ClassChanges) -> StoreResult<Class>;

    /// Deletes the class and clears `class_id` on its students. Returns the
    /// ids of the students that were unassigned.
    async fn delete_class(&self, id: u64) -> StoreResult<Vec<u64>>;

    async fn count_students_in_class(&self, class_id: u64) -> StoreResult<usize>;

    /// Inserts a student into `new.class_id`.
    ///
    /// Fails with [`StoreError::NotFound`] for an unknown class and
    /// [`StoreError::ClassFull`] when the class is at capacity at the moment
    /// of the write.
    async fn insert_student(&self, new: NewStudent) -> StoreResult<Student>;

    async fn find_student(&self, id: u64) -> StoreResult<Option<Student>>;

    async fn list_students(&self) -> StoreResult<Vec<Student>>;

    /// Applies the present fields. Moving the student into a different class
    /// is checked like an insert.
    async fn update_student(&self, id: u64, changes: StudentChanges) -> StoreResult<Student>;

    /// Deletes and returns the student as it was.
    async fn delete_student(&self, id: u64) -> StoreResult<Student>;
}
