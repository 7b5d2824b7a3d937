//! In-process relational store.
//!
//! Two tables behind one `RwLock`. Conditional writes hold the write lock
//! across check and mutation, which serializes them the way a row lock on
//! the class would.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreError;
use crate::models::{Class, ClassChanges, NewClass, NewStudent, Student, StudentChanges};
use crate::store::{Store, StoreResult};

#[derive(Debug, Clone)]
struct ClassRow {
    id: u64,
    name: String,
    teacher: String,
    capacity: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    classes: BTreeMap<u64, ClassRow>,
    students: BTreeMap<u64, Student>,
    last_class_id: u64,
    last_student_id: u64,
}

impl Tables {
    fn enrolled_in(&self, class_id: u64) -> impl Iterator<Item = &Student> {
        self.students
            .values()
            .filter(move |s| s.class_id == Some(class_id))
    }

    fn class_with_students(&self, row: &ClassRow) -> Class {
        Class {
            id: row.id,
            name: row.name.clone(),
            teacher: row.teacher.clone(),
            capacity: row.capacity,
            students: self.enrolled_in(row.id).cloned().collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    /// Capacity guard shared by insert and re-assignment.
    fn ensure_room(&self, class_id: u64) -> StoreResult<()> {
        let class = self.classes.get(&class_id).ok_or(StoreError::NotFound {
            entity: "class",
            id: class_id,
        })?;
        if self.enrolled_in(class_id).count() >= class.capacity as usize {
            return Err(StoreError::ClassFull {
                class_id,
                capacity: class.capacity,
            });
        }
        Ok(())
    }
}

fn next_id(last: &mut u64, table: &str) -> StoreResult<u64> {
    *last = last
        .checked_add(1)
        .ok_or_else(|| StoreError::Backend(format!("{table} id sequence exhausted")))?;
    Ok(*last)
}

// == Memory Store ==
/// [`Store`] kept in process memory. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_class(&self, new: NewClass) -> StoreResult<Class> {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.last_class_id, "classes")?;
        let now = Utc::now();
        let row = ClassRow {
            id,
            name: new.name,
            teacher: new.teacher,
            capacity: new.capacity,
            created_at: now,
            updated_at: now,
        };
        let class = tables.class_with_students(&row);
        tables.classes.insert(id, row);
        debug!(class_id = id, "inserted class");
        Ok(class)
    }

    async fn find_class(&self, id: u64) -> StoreResult<Option<Class>> {
        let tables = self.tables.read().await;
        Ok(tables
            .classes
            .get(&id)
            .map(|row| tables.class_with_students(row)))
    }

    async fn list_classes(&self) -> StoreResult<Vec<Class>> {
        let tables = self.tables.read().await;
        Ok(tables
            .classes
            .values()
            .map(|row| tables.class_with_students(row))
            .collect())
    }

    async fn update_class(&self, id: u64, changes: ClassChanges) -> StoreResult<Class> {
        let mut tables = self.tables.write().await;
        let enrolled = tables.enrolled_in(id).count();
        let row = tables.classes.get_mut(&id).ok_or(StoreError::NotFound {
            entity: "class",
            id,
        })?;
        if (changes.capacity as usize) < enrolled {
            return Err(StoreError::CapacityBelowEnrollment {
                requested: changes.capacity,
                enrolled,
            });
        }

        row.name = changes.name;
        row.teacher = changes.teacher;
        row.capacity = changes.capacity;
        row.updated_at = Utc::now();
        let row = row.clone();
        Ok(tables.class_with_students(&row))
    }

    async fn delete_class(&self, id: u64) -> StoreResult<Vec<u64>> {
        let mut tables = self.tables.write().await;
        if tables.classes.remove(&id).is_none() {
            return Err(StoreError::NotFound {
                entity: "class",
                id,
            });
        }

        let now = Utc::now();
        let mut unassigned = Vec::new();
        for student in tables.students.values_mut() {
            if student.class_id == Some(id) {
                student.class_id = None;
                student.updated_at = now;
                unassigned.push(student.id);
            }
        }
        debug!(class_id = id, unassigned = unassigned.len(), "deleted class");
        Ok(unassigned)
    }

    async fn count_students_in_class(&self, class_id: u64) -> StoreResult<usize> {
        Ok(self.tables.read().await.enrolled_in(class_id).count())
    }

    async fn insert_student(&self, new: NewStudent) -> StoreResult<Student> {
        let mut tables = self.tables.write().await;
        tables.ensure_room(new.class_id)?;

        let id = next_id(&mut tables.last_student_id, "students")?;
        let now = Utc::now();
        let student = Student {
            id,
            name: new.name,
            age: new.age,
            email: new.email,
            class_id: Some(new.class_id),
            created_at: now,
            updated_at: now,
        };
        tables.students.insert(id, student.clone());
        debug!(student_id = id, class_id = new.class_id, "inserted student");
        Ok(student)
    }

    async fn find_student(&self, id: u64) -> StoreResult<Option<Student>> {
        Ok(self.tables.read().await.students.get(&id).cloned())
    }

    async fn list_students(&self) -> StoreResult<Vec<Student>> {
        Ok(self.tables.read().await.students.values().cloned().collect())
    }

    async fn update_student(&self, id: u64, changes: StudentChanges) -> StoreResult<Student> {
        let mut tables = self.tables.write().await;
        let current = tables
            .students
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "student",
                id,
            })?;

        let mut updated = current.clone();
        changes.apply(&mut updated);
        if let Some(class_id) = updated.class_id {
            if updated.class_id != current.class_id {
                tables.ensure_room(class_id)?;
            }
        }
        updated.updated_at = Utc::now();
        tables.students.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_student(&self, id: u64) -> StoreResult<Student> {
        self.tables
            .write()
            .await
            .students
            .remove(&id)
            .ok_or(StoreError::NotFound {
                entity: "student",
                id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_class(capacity: u32) -> NewClass {
        NewClass {
            name: "Math 101".to_string(),
            teacher: "Jane Smith".to_string(),
            capacity,
        }
    }

    fn new_student(name: &str, class_id: u64) -> NewStudent {
        NewStudent {
            name: name.to_string(),
            age: 20,
            email: format!("{}@example.com", name.to_lowercase()),
            class_id,
        }
    }

    #[tokio::test]
    async fn test_ids_are_store_assigned() {
        let store = MemoryStore::new();

        let first = store.insert_class(new_class(2)).await.unwrap();
        let second = store.insert_class(new_class(2)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_find_class_includes_students() {
        let store = MemoryStore::new();
        let class = store.insert_class(new_class(2)).await.unwrap();
        store.insert_student(new_student("Ann", class.id)).await.unwrap();

        let found = store.find_class(class.id).await.unwrap().unwrap();
        assert_eq!(found.enrolled(), 1);
        assert_eq!(found.students[0].name, "Ann");
        assert!(store.find_class(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_student_rejects_full_class() {
        let store = MemoryStore::new();
        let class = store.insert_class(new_class(1)).await.unwrap();
        store.insert_student(new_student("Ann", class.id)).await.unwrap();

        let result = store.insert_student(new_student("Bob", class.id)).await;

        assert!(matches!(result, Err(StoreError::ClassFull { capacity: 1, .. })));
        assert_eq!(store.list_students().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_student_rejects_unknown_class() {
        let store = MemoryStore::new();

        let result = store.insert_student(new_student("Ann", 0)).await;
        assert!(matches!(
            result,
            Err(StoreError::NotFound { entity: "class", .. })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_inserts_never_exceed_capacity() {
        let store = MemoryStore::new();
        let class_id = store.insert_class(new_class(3)).await.unwrap().id;

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .insert_student(new_student(&format!("S{i}"), class_id))
                    .await
            }));
        }
        let mut accepted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                accepted += 1;
            }
        }

        assert_eq!(accepted, 3);
        assert_eq!(store.count_students_in_class(class_id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_update_class_capacity_floor() {
        let store = MemoryStore::new();
        let class = store.insert_class(new_class(5)).await.unwrap();
        store.insert_student(new_student("Ann", class.id)).await.unwrap();
        store.insert_student(new_student("Bob", class.id)).await.unwrap();

        let changes = |capacity| ClassChanges {
            name: "Math 102".to_string(),
            teacher: "Jane Smith".to_string(),
            capacity,
        };

        let below = store.update_class(class.id, changes(1)).await;
        assert!(matches!(
            below,
            Err(StoreError::CapacityBelowEnrollment { enrolled: 2, .. })
        ));

        let exact = store.update_class(class.id, changes(2)).await.unwrap();
        assert_eq!(exact.capacity, 2);
        assert_eq!(exact.name, "Math 102");
    }

    #[tokio::test]
    async fn test_delete_class_nulls_students() {
        let store = MemoryStore::new();
        let class = store.insert_class(new_class(2)).await.unwrap();
        let ann = store.insert_student(new_student("Ann", class.id)).await.unwrap();

        let unassigned = store.delete_class(class.id).await.unwrap();

        assert_eq!(unassigned, vec![ann.id]);
        let ann = store.find_student(ann.id).await.unwrap().unwrap();
        assert_eq!(ann.class_id, None);
        assert!(store.find_class(class.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_student_reassignment_checks_capacity() {
        let store = MemoryStore::new();
        let open = store.insert_class(new_class(2)).await.unwrap();
        let full = store.insert_class(new_class(1)).await.unwrap();
        let ann = store.insert_student(new_student("Ann", open.id)).await.unwrap();
        store.insert_student(new_student("Bob", full.id)).await.unwrap();

        let moved = store
            .update_student(
                ann.id,
                StudentChanges {
                    class_id: Some(Some(full.id)),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(moved, Err(StoreError::ClassFull { .. })));

        // Unchanged class does not count the student against itself
        let renamed = store
            .update_student(
                ann.id,
                StudentChanges {
                    name: Some("Anna".to_string()),
                    class_id: Some(Some(open.id)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Anna");
    }

    #[tokio::test]
    async fn test_delete_student() {
        let store = MemoryStore::new();
        let class = store.insert_class(new_class(2)).await.unwrap();
        let ann = store.insert_student(new_student("Ann", class.id)).await.unwrap();

        let deleted = store.delete_student(ann.id).await.unwrap();
        assert_eq!(deleted.id, ann.id);
        assert!(matches!(
            store.delete_student(ann.id).await,
            Err(StoreError::NotFound { entity: "student", .. })
        ));
    }
}
