//! API Routes
//!
//! Configures the Axum router with the class, student and health endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_class, create_student, delete_class, delete_student, get_class, get_student,
    health_handler, list_classes, list_students, update_class, update_student, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /classes`, `GET /classes`
/// - `GET /classes/:id`, `PUT /classes/:id`, `DELETE /classes/:id`
/// - `POST /students`, `GET /students`
/// - `GET /students/:id`, `PUT /students/:id`, `DELETE /students/:id`
/// - `GET /health`
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/classes", get(list_classes).post(create_class))
        .route(
            "/classes/:id",
            get(get_class).put(update_class).delete(delete_class),
        )
        .route("/students", get(list_students).post(create_student))
        .route(
            "/students/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
