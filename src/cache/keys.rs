//! Cache key convention and the key-dependency map.
//!
//! Every mutating operation asks this module which keys it makes stale
//! instead of listing keys at the call site.

use std::time::Duration;

/// Aggregate key holding every class with its enrolled students.
pub const CLASSES_KEY: &str = "classes";
/// Aggregate key holding every student.
pub const STUDENTS_KEY: &str = "students";

/// TTL applied to every cache write unless configured otherwise.
pub const DEFAULT_ENTRY_TTL: Duration = Duration::from_secs(10 * 60);

pub fn class_key(id: u64) -> String {
    format!("class:{id}")
}

pub fn student_key(id: u64) -> String {
    format!("student:{id}")
}

/// Keys made stale by creating, updating or deleting class `id`.
///
/// `enrolled` lists students whose cached copies embed the class reference;
/// it is only non-empty for deletion, which nulls their `class_id`.
pub fn stale_after_class_write(id: u64, enrolled: &[u64]) -> Vec<String> {
    let mut keys = vec![class_key(id), CLASSES_KEY.to_string()];
    if !enrolled.is_empty() {
        keys.push(STUDENTS_KEY.to_string());
        keys.extend(enrolled.iter().copied().map(student_key));
    }
    keys
}

/// Aggregate and class keys made stale by a write to one student.
///
/// The student's own key is not included: callers either refresh it
/// (create/update) or remove it (delete). `classes` lists the class ids the
/// student belonged to before and after the write; classes embed their
/// enrolled students, so each of them is stale too.
pub fn stale_after_student_write(classes: &[Option<u64>]) -> Vec<String> {
    let mut keys = vec![STUDENTS_KEY.to_string(), CLASSES_KEY.to_string()];
    for id in classes.iter().flatten() {
        let key = class_key(*id);
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        assert_eq!(class_key(5), "class:5");
        assert_eq!(student_key(12), "student:12");
    }

    #[test]
    fn test_class_write_invalidates_per_id_and_aggregate() {
        assert_eq!(stale_after_class_write(3, &[]), vec!["class:3", "classes"]);
    }

    #[test]
    fn test_class_delete_invalidates_enrolled_students() {
        let keys = stale_after_class_write(3, &[7, 8]);
        assert_eq!(
            keys,
            vec!["class:3", "classes", "students", "student:7", "student:8"]
        );
    }

    #[test]
    fn test_student_write_invalidates_each_class_once() {
        let keys = stale_after_student_write(&[Some(2), Some(2), None, Some(4)]);
        assert_eq!(keys, vec!["students", "classes", "class:2", "class:4"]);
    }
}
