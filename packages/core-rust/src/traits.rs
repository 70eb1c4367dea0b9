use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::{NewTeacher, Teacher, TeacherUpdate};

/// The remote roster API.
///
/// The roster is owned by the server; implementations perform exactly one
/// request per call and never retry. Implementations: HTTP (`reqwest`),
/// in-memory fakes (tests).
#[async_trait]
pub trait RosterApi: Send + Sync {
    /// Fetches the full roster in server order.
    async fn list_teachers(&self) -> Result<Vec<Teacher>, ApiError>;

    /// Creates a teacher record.
    async fn create_teacher(&self, teacher: &NewTeacher) -> Result<(), ApiError>;

    /// Replaces the editable fields of the teacher keyed by `update.teacher_id`.
    async fn update_teacher(&self, update: &TeacherUpdate) -> Result<(), ApiError>;

    /// Deletes one teacher by identifier.
    async fn delete_teacher(&self, teacher_id: &str) -> Result<(), ApiError>;
}

#[async_trait]
impl<T: RosterApi + ?Sized> RosterApi for Arc<T> {
    async fn list_teachers(&self) -> Result<Vec<Teacher>, ApiError> {
        (**self).list_teachers().await
    }

    async fn create_teacher(&self, teacher: &NewTeacher) -> Result<(), ApiError> {
        (**self).create_teacher(teacher).await
    }

    async fn update_teacher(&self, update: &TeacherUpdate) -> Result<(), ApiError> {
        (**self).update_teacher(update).await
    }

    async fn delete_teacher(&self, teacher_id: &str) -> Result<(), ApiError> {
        (**self).delete_teacher(teacher_id).await
    }
}
