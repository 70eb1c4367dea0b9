//! Roster API route handlers.
//!
//! Status codes follow the production API's contract: 200 for successful
//! reads, edits and deletes, 201 for creates, 404 for unknown identifiers,
//! 409 for duplicate creates, 500 for injected failures.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use comlab_core::{NewTeacher, Teacher, TeacherUpdate};
use serde_json::json;
use tracing::{info, warn};

use super::store::{RosterStore, StoreError};

/// Shared state passed to all handlers via `State` extraction.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RosterStore>,
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

/// `GET /teacher/getTeachers`
pub async fn list_teachers_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Teacher>>, StoreError> {
    let teachers = state.store.list().inspect_err(|e| warn!("list failed: {e}"))?;
    Ok(Json(teachers))
}

/// `POST /teacher/addTeacher`
pub async fn add_teacher_handler(
    State(state): State<AppState>,
    Json(teacher): Json<NewTeacher>,
) -> Result<(StatusCode, Json<serde_json::Value>), StoreError> {
    let id = teacher.teacher_id.clone();
    state.store.create(teacher).inspect_err(|e| warn!("create {id} failed: {e}"))?;
    info!("created teacher {id}");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Teacher added", "teacher_id": id })),
    ))
}

/// `POST /teacher/editTeacher`
pub async fn edit_teacher_handler(
    State(state): State<AppState>,
    Json(update): Json<TeacherUpdate>,
) -> Result<Json<serde_json::Value>, StoreError> {
    let id = update.teacher_id.clone();
    state.store.update(update).inspect_err(|e| warn!("edit {id} failed: {e}"))?;
    info!("updated teacher {id}");
    Ok(Json(json!({ "message": "Teacher updated", "teacher_id": id })))
}

/// `DELETE /teacher/deleteTeacher/{teacher_id}`
pub async fn delete_teacher_handler(
    State(state): State<AppState>,
    Path(teacher_id): Path<String>,
) -> Result<Json<serde_json::Value>, StoreError> {
    state
        .store
        .delete(&teacher_id)
        .inspect_err(|e| warn!("delete {teacher_id} failed: {e}"))?;
    info!("deleted teacher {teacher_id}");
    Ok(Json(
        json!({ "message": "Teacher deleted", "teacher_id": teacher_id }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teacher(id: &str) -> Teacher {
        Teacher {
            teacher_id: id.to_string(),
            lastname: "Reyes".to_string(),
            firstname: "Ana".to_string(),
            teacher_email: "ana@school.edu".to_string(),
            courses: vec!["BSIS".to_string()],
            sections: vec!["4A".to_string()],
            subjects: vec!["Programming".to_string()],
            password: None,
        }
    }

    fn test_state(teachers: Vec<Teacher>) -> AppState {
        AppState {
            store: Arc::new(RosterStore::with_teachers(teachers)),
        }
    }

    #[tokio::test]
    async fn list_returns_roster() {
        let state = test_state(vec![teacher("2021-00001")]);
        let Json(list) = list_teachers_handler(State(state)).await.unwrap();
        assert_eq!(list.len(), 1);
    }

    #[tokio::test]
    async fn delete_unknown_is_404() {
        let state = test_state(vec![]);
        let err = delete_teacher_handler(State(state), Path("nope".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn injected_failure_is_500() {
        let state = test_state(vec![teacher("2021-00001")]);
        state.store.fail_list(true);
        let err = list_teachers_handler(State(state)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn add_returns_201() {
        let state = test_state(vec![]);
        let new = NewTeacher {
            teacher_id: "2021-00009".to_string(),
            teacher_email: "b@school.edu".to_string(),
            lastname: "B".to_string(),
            firstname: "B".to_string(),
            courses: vec![],
            sections: vec![],
            subjects: vec![],
            password: None,
        };
        let (status, _) = add_teacher_handler(State(state.clone()), Json(new))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(state.store.len(), 1);
    }
}
