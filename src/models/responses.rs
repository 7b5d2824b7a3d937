//! Response DTOs for the roster API
//!
//! Envelopes match the wire shapes clients already depend on:
//! `{"class": …}`, `{"classes": […]}`, `{"student": …}` and
//! `{"message": …}`. Student reads return the bare record.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::models::domain::{Class, Student};

/// `{"class": …}` for create, get, and update of a class
#[derive(Debug, Clone, Serialize)]
pub struct ClassEnvelope {
    pub class: Class,
}

/// `{"classes": […]}` for `GET /classes`
#[derive(Debug, Clone, Serialize)]
pub struct ClassesEnvelope {
    pub classes: Vec<Class>,
}

/// `{"student": …}` for create and update of a student
#[derive(Debug, Clone, Serialize)]
pub struct StudentEnvelope {
    pub student: Student,
}

/// `{"message": …}` for deletes
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Current timestamp in RFC 3339 format
    pub timestamp: String,
    pub cache: CacheStats,
    pub cache_hit_rate: f64,
}

impl HealthResponse {
    pub fn healthy(cache: CacheStats) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            cache_hit_rate: cache.hit_rate(),
            cache,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_class_envelope_shape() {
        let now = Utc::now();
        let envelope = ClassEnvelope {
            class: Class {
                id: 1,
                name: "Math 101".to_string(),
                teacher: "Jane Smith".to_string(),
                capacity: 30,
                students: Vec::new(),
                created_at: now,
                updated_at: now,
            },
        };

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["class"]["id"], 1);
        assert_eq!(json["class"]["capacity"], 30);
        assert!(json["class"]["students"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_unassigned_student_serializes_null_class() {
        let now = Utc::now();
        let envelope = StudentEnvelope {
            student: Student {
                id: 4,
                name: "John Doe".to_string(),
                age: 20,
                email: "john.doe@example.com".to_string(),
                class_id: None,
                created_at: now,
                updated_at: now,
            },
        };

        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json["student"]["class_id"].is_null());
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy(CacheStats::default());
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
        assert!(json.contains("hits"));
    }
}
