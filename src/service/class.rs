//! Class Manager
//!
//! Class CRUD over the store with read-through caching. Every mutation
//! drops the keys `cache::keys` lists for it; capacity may never be set
//! below live enrollment.

use std::sync::Arc;

use tracing::info;

use crate::cache::keys::{class_key, stale_after_class_write, CLASSES_KEY};
use crate::error::{capacity_floor_message, AppError, Result};
use crate::models::{Class, CreateClassRequest, UpdateClassRequest};
use crate::service::CacheCoordinator;
use crate::store::Store;

#[derive(Clone)]
pub struct ClassManager {
    store: Arc<dyn Store>,
    cache: CacheCoordinator,
}

fn class_not_found() -> AppError {
    AppError::NotFound("Class not found".to_string())
}

impl ClassManager {
    pub fn new(store: Arc<dyn Store>, cache: CacheCoordinator) -> Self {
        Self { store, cache }
    }

    pub async fn create(&self, request: &CreateClassRequest) -> Result<Class> {
        let new = request.validate()?;
        let class = self.store.insert_class(new).await?;
        info!(class_id = class.id, capacity = class.capacity, "class created");

        self.cache
            .invalidate(&stale_after_class_write(class.id, &[]))
            .await?;
        Ok(class)
    }

    /// Every class with its enrolled students.
    pub async fn list(&self) -> Result<Vec<Class>> {
        self.cache
            .read_through(CLASSES_KEY, || async {
                self.store.list_classes().await.map_err(AppError::from)
            })
            .await
    }

    pub async fn get(&self, id: u64) -> Result<Class> {
        self.cache
            .read_through(&class_key(id), || async {
                self.store
                    .find_class(id)
                    .await
                    .map_err(AppError::from)
                    .and_then(|found| found.ok_or_else(class_not_found))
            })
            .await
    }

    /// Replaces name, teacher and capacity.
    ///
    /// Enrollment is read from the store, never from the cache. The store
    /// repeats the capacity check atomically with the write, so a student
    /// enrolled between the two checks still cannot push the class over.
    pub async fn update(&self, id: u64, request: &UpdateClassRequest) -> Result<Class> {
        let changes = request.validate()?;
        let current = self
            .store
            .find_class(id)
            .await?
            .ok_or_else(class_not_found)?;

        let enrolled = current.enrolled();
        if (changes.capacity as usize) < enrolled {
            return Err(AppError::Validation(capacity_floor_message(enrolled)));
        }

        let class = self.store.update_class(id, changes).await?;
        info!(class_id = id, capacity = class.capacity, "class updated");

        self.cache.invalidate(&stale_after_class_write(id, &[])).await?;
        Ok(class)
    }

    /// Deletes the class. Its students stay, unassigned.
    pub async fn delete(&self, id: u64) -> Result<()> {
        self.store
            .find_class(id)
            .await?
            .ok_or_else(class_not_found)?;

        let unassigned = self.store.delete_class(id).await?;
        info!(class_id = id, unassigned = unassigned.len(), "class deleted");

        self.cache
            .invalidate(&stale_after_class_write(id, &unassigned))
            .await
    }
}
