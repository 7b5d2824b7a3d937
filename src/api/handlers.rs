//! API Handlers
//!
//! HTTP request handlers for the class and student endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::cache::Cache;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    ClassEnvelope, ClassesEnvelope, CreateClassRequest, CreateStudentRequest, HealthResponse,
    MessageResponse, Student, StudentEnvelope, UpdateClassRequest, UpdateStudentRequest,
};
use crate::service::{CacheCoordinator, ClassManager, StudentManager};
use crate::store::Store;

/// Application state shared across all handlers.
///
/// Managers receive their store and cache at construction; nothing is
/// reached through globals.
#[derive(Clone)]
pub struct AppState {
    pub classes: ClassManager,
    pub students: StudentManager,
    pub cache: Arc<dyn Cache>,
}

impl AppState {
    /// Wires both managers to one store and one cache.
    pub fn new(store: Arc<dyn Store>, cache: Arc<dyn Cache>, config: &Config) -> Self {
        let coordinator = CacheCoordinator::new(
            Arc::clone(&cache),
            config.cache_ttl(),
            config.cache_write_policy,
        );
        Self {
            classes: ClassManager::new(Arc::clone(&store), coordinator.clone()),
            students: StudentManager::new(store, coordinator),
            cache,
        }
    }
}

/// Path ids are positive integers; anything else is a client error.
fn parse_id(raw: &str) -> Result<u64> {
    match raw.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::Validation(format!("Invalid id '{}'", raw))),
    }
}

/// Turns axum's body rejection into the API's error body.
fn body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

// == Class Handlers ==

/// Handler for POST /classes
pub async fn create_class(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateClassRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ClassEnvelope>)> {
    let request = body(payload)?;
    let class = state.classes.create(&request).await?;
    Ok((StatusCode::CREATED, Json(ClassEnvelope { class })))
}

/// Handler for GET /classes
pub async fn list_classes(State(state): State<AppState>) -> Result<Json<ClassesEnvelope>> {
    let classes = state.classes.list().await?;
    Ok(Json(ClassesEnvelope { classes }))
}

/// Handler for GET /classes/:id
pub async fn get_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClassEnvelope>> {
    let class = state.classes.get(parse_id(&id)?).await?;
    Ok(Json(ClassEnvelope { class }))
}

/// Handler for PUT /classes/:id
pub async fn update_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdateClassRequest>, JsonRejection>,
) -> Result<Json<ClassEnvelope>> {
    let id = parse_id(&id)?;
    let request = body(payload)?;
    let class = state.classes.update(id, &request).await?;
    Ok(Json(ClassEnvelope { class }))
}

/// Handler for DELETE /classes/:id
pub async fn delete_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.classes.delete(parse_id(&id)?).await?;
    Ok(Json(MessageResponse::new("Class deleted successfully")))
}

// == Student Handlers ==

/// Handler for POST /students
pub async fn create_student(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateStudentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StudentEnvelope>)> {
    let request = body(payload)?;
    let student = state.students.create(&request).await?;
    Ok((StatusCode::CREATED, Json(StudentEnvelope { student })))
}

/// Handler for GET /students
pub async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<Student>>> {
    Ok(Json(state.students.list().await?))
}

/// Handler for GET /students/:id
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Student>> {
    Ok(Json(state.students.get(parse_id(&id)?).await?))
}

/// Handler for PUT /students/:id
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdateStudentRequest>, JsonRejection>,
) -> Result<Json<StudentEnvelope>> {
    let id = parse_id(&id)?;
    let request = body(payload)?;
    let student = state.students.update(id, &request).await?;
    Ok(Json(StudentEnvelope { student }))
}

/// Handler for DELETE /students/:id
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.students.delete(parse_id(&id)?).await?;
    Ok(Json(MessageResponse::new("Student deleted successfully")))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.stats().await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::store::MemoryStore;

    fn test_state() -> AppState {
        AppState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryCache::new(100)),
            &Config::default(),
        )
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("5").unwrap(), 5);
        assert!(matches!(parse_id("0"), Err(AppError::Validation(_))));
        assert!(matches!(parse_id("abc"), Err(AppError::Validation(_))));
        assert!(matches!(parse_id("-1"), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_and_get_class_handler() {
        let state = test_state();
        let request = CreateClassRequest {
            name: Some("Math 101".to_string()),
            teacher: Some("Jane Smith".to_string()),
            capacity: Some(30),
        };

        let (status, Json(created)) = create_class(State(state.clone()), Ok(Json(request)))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(fetched) = get_class(State(state), Path(created.class.id.to_string()))
            .await
            .unwrap();
        assert_eq!(fetched.class, created.class);
    }

    #[tokio::test]
    async fn test_get_student_bad_id() {
        let result = get_student(State(test_state()), Path("x1".to_string())).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler(State(test_state())).await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.cache.entries, 0);
    }
}
