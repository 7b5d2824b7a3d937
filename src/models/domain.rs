//! Domain records and the validated inputs used to create or change them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A class together with the students currently enrolled in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub id: u64,
    pub name: String,
    pub teacher: String,
    pub capacity: u32,
    #[serde(default)]
    pub students: Vec<Student>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Class {
    pub fn enrolled(&self) -> usize {
        self.students.len()
    }
}

/// A student. `class_id` is `None` while unassigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: u64,
    pub name: String,
    pub age: u32,
    pub email: String,
    pub class_id: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClass {
    pub name: String,
    pub teacher: String,
    pub capacity: u32,
}

/// Full replacement of a class's editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassChanges {
    pub name: String,
    pub teacher: String,
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub age: u32,
    pub email: String,
    pub class_id: u64,
}

/// Partial student update; `None` leaves a field unchanged.
///
/// `class_id: Some(None)` unassigns the student.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentChanges {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub email: Option<String>,
    pub class_id: Option<Option<u64>>,
}

impl StudentChanges {
    /// Applies the present fields to `student`.
    pub fn apply(&self, student: &mut Student) {
        if let Some(name) = &self.name {
            student.name = name.clone();
        }
        if let Some(age) = self.age {
            student.age = age;
        }
        if let Some(email) = &self.email {
            student.email = email.clone();
        }
        if let Some(class_id) = self.class_id {
            student.class_id = class_id;
        }
    }
}
