//! Student Manager
//!
//! Student CRUD over the store with read-through caching. Enrollment into a
//! class is checked against the store's live count and re-checked by the
//! store's conditional insert.

use std::sync::Arc;

use tracing::info;

use crate::cache::keys::{stale_after_student_write, student_key, STUDENTS_KEY};
use crate::error::{AppError, Result};
use crate::models::{CreateStudentRequest, Student, UpdateStudentRequest};
use crate::service::CacheCoordinator;
use crate::store::Store;

#[derive(Clone)]
pub struct StudentManager {
    store: Arc<dyn Store>,
    cache: CacheCoordinator,
}

fn student_not_found() -> AppError {
    AppError::NotFound("Student not found".to_string())
}

impl StudentManager {
    pub fn new(store: Arc<dyn Store>, cache: CacheCoordinator) -> Self {
        Self { store, cache }
    }

    /// Enrolls a new student into an existing class that has room.
    pub async fn create(&self, request: &CreateStudentRequest) -> Result<Student> {
        let new = request.validate()?;
        let class = self
            .store
            .find_class(new.class_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Class not found".to_string()))?;

        let enrolled = self.store.count_students_in_class(class.id).await?;
        if enrolled >= class.capacity as usize {
            return Err(AppError::Validation(
                "Cannot add student: class is full".to_string(),
            ));
        }

        let student = self.store.insert_student(new).await?;
        info!(student_id = student.id, class_id = class.id, "student created");

        self.cache.refresh(&student_key(student.id), &student).await?;
        self.cache
            .invalidate(&stale_after_student_write(&[student.class_id]))
            .await?;
        Ok(student)
    }

    pub async fn list(&self) -> Result<Vec<Student>> {
        self.cache
            .read_through(STUDENTS_KEY, || async {
                self.store.list_students().await.map_err(AppError::from)
            })
            .await
    }

    pub async fn get(&self, id: u64) -> Result<Student> {
        self.cache
            .read_through(&student_key(id), || async {
                self.store
                    .find_student(id)
                    .await
                    .map_err(AppError::from)
                    .and_then(|found| found.ok_or_else(student_not_found))
            })
            .await
    }

    /// Applies the fields present in `request`. Moving the student into a
    /// different class is subject to that class's capacity.
    pub async fn update(&self, id: u64, request: &UpdateStudentRequest) -> Result<Student> {
        let existing = self
            .store
            .find_student(id)
            .await?
            .ok_or_else(student_not_found)?;
        let changes = request.validate()?;

        let student = self.store.update_student(id, changes).await?;
        info!(student_id = id, class_id = ?student.class_id, "student updated");

        self.cache.refresh(&student_key(id), &student).await?;
        self.cache
            .invalidate(&stale_after_student_write(&[
                existing.class_id,
                student.class_id,
            ]))
            .await?;
        Ok(student)
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        self.store
            .find_student(id)
            .await?
            .ok_or_else(student_not_found)?;

        let removed = self.store.delete_student(id).await?;
        info!(student_id = id, "student deleted");

        let mut stale = vec![student_key(id)];
        stale.extend(stale_after_student_write(&[removed.class_id]));
        self.cache.invalidate(&stale).await
    }
}
