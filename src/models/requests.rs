//! Request DTOs for the roster API
//!
//! Bodies are bound into loosely typed DTOs first (every field optional) and
//! then validated into the domain inputs in [`super::domain`]. Validation
//! reports every violated field, not just the first.

use std::fmt;

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::domain::{ClassChanges, NewClass, NewStudent, StudentChanges};

/// Age assigned when a create request omits it.
pub const DEFAULT_AGE: u32 = 1;

// == Field Violation ==
/// One field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Accumulates violations while a request is checked.
#[derive(Debug, Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldViolation::new(field, message));
    }

    /// Trimmed non-blank text, recording a violation otherwise.
    fn required_text(&mut self, field: &'static str, value: Option<&str>) -> String {
        match value.map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            Some(_) => {
                self.push(field, "must not be empty");
                String::new()
            }
            None => {
                self.push(field, "is required");
                String::new()
            }
        }
    }

    fn optional_text(&mut self, field: &'static str, value: Option<&str>) -> Option<String> {
        value.map(|text| self.required_text(field, Some(text)))
    }

    fn email(&mut self, value: Option<&str>) -> Option<String> {
        let email = value?.trim();
        if email.is_empty() {
            self.push("email", "must not be empty");
        } else if !looks_like_email(email) {
            self.push("email", "must be a valid email address");
        }
        Some(email.to_string())
    }

    fn non_negative(&mut self, field: &'static str, value: i64) -> u32 {
        match u32::try_from(value) {
            Ok(n) => n,
            Err(_) if value < 0 => {
                self.push(field, "must be zero or greater");
                0
            }
            Err(_) => {
                self.push(field, format!("must not exceed {}", u32::MAX));
                0
            }
        }
    }

    fn finish<T>(self, value: T) -> Result<T> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(AppError::InvalidFields(self.0))
        }
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

// == Class Requests ==
/// Body of `POST /classes`. Unknown fields such as `id` or `students` are
/// ignored; the store assigns ids and enrollment is owned by students.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateClassRequest {
    pub name: Option<String>,
    pub teacher: Option<String>,
    pub capacity: Option<i64>,
}

impl CreateClassRequest {
    pub fn validate(&self) -> Result<NewClass> {
        let (name, teacher, capacity) =
            validate_class_fields(self.name.as_deref(), self.teacher.as_deref(), self.capacity)?;
        Ok(NewClass {
            name,
            teacher,
            capacity,
        })
    }
}

/// Body of `PUT /classes/:id`; all three fields are replaced.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub teacher: Option<String>,
    pub capacity: Option<i64>,
}

impl UpdateClassRequest {
    pub fn validate(&self) -> Result<ClassChanges> {
        let (name, teacher, capacity) =
            validate_class_fields(self.name.as_deref(), self.teacher.as_deref(), self.capacity)?;
        Ok(ClassChanges {
            name,
            teacher,
            capacity,
        })
    }
}

fn validate_class_fields(
    name: Option<&str>,
    teacher: Option<&str>,
    capacity: Option<i64>,
) -> Result<(String, String, u32)> {
    let mut violations = Violations::default();
    let name = violations.required_text("name", name);
    let teacher = violations.required_text("teacher", teacher);
    let capacity = match capacity {
        Some(value) => violations.non_negative("capacity", value),
        None => {
            violations.push("capacity", "is required");
            0
        }
    };
    violations.finish((name, teacher, capacity))
}

// == Student Requests ==
/// Body of `POST /students`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateStudentRequest {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub email: Option<String>,
    /// Missing or `0` means no class, which the create path rejects as an
    /// unknown class.
    pub class_id: Option<u64>,
}

impl CreateStudentRequest {
    pub fn validate(&self) -> Result<NewStudent> {
        let mut violations = Violations::default();
        let name = violations.required_text("name", self.name.as_deref());
        let email = match violations.email(self.email.as_deref()) {
            Some(email) => email,
            None => {
                violations.push("email", "is required");
                String::new()
            }
        };
        let age = self
            .age
            .map(|age| violations.non_negative("age", age))
            .unwrap_or(DEFAULT_AGE);

        violations.finish(NewStudent {
            name,
            age,
            email,
            class_id: self.class_id.unwrap_or(0),
        })
    }
}

/// Body of `PUT /students/:id`; absent fields are left unchanged and a
/// `class_id` of `0` unassigns the student.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub email: Option<String>,
    pub class_id: Option<u64>,
}

impl UpdateStudentRequest {
    pub fn validate(&self) -> Result<StudentChanges> {
        let mut violations = Violations::default();
        let name = violations.optional_text("name", self.name.as_deref());
        let email = violations.email(self.email.as_deref());
        let age = self.age.map(|age| violations.non_negative("age", age));
        let class_id = self.class_id.map(|id| (id != 0).then_some(id));

        violations.finish(StudentChanges {
            name,
            age,
            email,
            class_id,
        })
    }
}
