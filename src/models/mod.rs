//! Domain records and the request/response DTOs of the roster API.

pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Class, ClassChanges, NewClass, NewStudent, Student, StudentChanges};
pub use requests::{
    CreateClassRequest, CreateStudentRequest, FieldViolation, UpdateClassRequest,
    UpdateStudentRequest,
};
pub use responses::{
    ClassEnvelope, ClassesEnvelope, HealthResponse, MessageResponse, StudentEnvelope,
};
