//! In-memory roster backing the test server.
//!
//! Keeps teachers in insertion order behind a `parking_lot::RwLock`, records
//! every call it receives, and can be told to fail specific calls so client
//! error paths can be exercised end to end.

use std::collections::HashSet;

use async_trait::async_trait;
use comlab_core::{ApiError, NewTeacher, RosterApi, Teacher, TeacherUpdate};
use parking_lot::{Mutex, RwLock};

use crate::api::endpoints;

/// A call observed by the store, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List,
    Create(String),
    Update(String),
    Delete(String),
}

/// Why the store refused a call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("teacher not found: {0}")]
    NotFound(String),
    #[error("teacher already exists: {0}")]
    Conflict(String),
    #[error("injected failure")]
    Injected,
}

impl StoreError {
    /// HTTP status the server answers with.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Injected => 500,
        }
    }
}

#[derive(Debug, Default)]
struct Faults {
    list: bool,
    ids: HashSet<String>,
}

/// Ordered in-memory teacher roster with fault injection.
#[derive(Debug, Default)]
pub struct RosterStore {
    teachers: RwLock<Vec<Teacher>>,
    faults: Mutex<Faults>,
    calls: Mutex<Vec<StoreCall>>,
}

impl RosterStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `teachers`, in the given order.
    #[must_use]
    pub fn with_teachers(teachers: Vec<Teacher>) -> Self {
        Self {
            teachers: RwLock::new(teachers),
            ..Self::default()
        }
    }

    /// Makes `list` fail until reset.
    pub fn fail_list(&self, fail: bool) {
        self.faults.lock().list = fail;
    }

    /// Makes create, update and delete calls for `teacher_id` fail until reset.
    pub fn fail_id(&self, teacher_id: &str) {
        self.faults.lock().ids.insert(teacher_id.to_string());
    }

    /// Clears all injected failures.
    pub fn clear_faults(&self) {
        *self.faults.lock() = Faults::default();
    }

    /// Calls received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.teachers.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.teachers.read().is_empty()
    }

    #[must_use]
    pub fn get(&self, teacher_id: &str) -> Option<Teacher> {
        self.teachers
            .read()
            .iter()
            .find(|t| t.teacher_id == teacher_id)
            .cloned()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().push(call);
    }

    fn check_fault(&self, teacher_id: &str) -> Result<(), StoreError> {
        if self.faults.lock().ids.contains(teacher_id) {
            Err(StoreError::Injected)
        } else {
            Ok(())
        }
    }

    /// Returns the roster in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Injected`] while list failures are enabled.
    pub fn list(&self) -> Result<Vec<Teacher>, StoreError> {
        self.record(StoreCall::List);
        if self.faults.lock().list {
            return Err(StoreError::Injected);
        }
        Ok(self.teachers.read().clone())
    }

    /// Appends a new teacher.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Injected`] for a failing identifier and
    /// [`StoreError::Conflict`] if the identifier is already taken.
    pub fn create(&self, teacher: NewTeacher) -> Result<(), StoreError> {
        self.record(StoreCall::Create(teacher.teacher_id.clone()));
        self.check_fault(&teacher.teacher_id)?;
        let mut teachers = self.teachers.write();
        if teachers.iter().any(|t| t.teacher_id == teacher.teacher_id) {
            return Err(StoreError::Conflict(teacher.teacher_id));
        }
        teachers.push(teacher.into());
        Ok(())
    }

    /// Replaces the editable fields of an existing teacher, keeping its
    /// position and password.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown identifier.
    pub fn update(&self, update: TeacherUpdate) -> Result<(), StoreError> {
        self.record(StoreCall::Update(update.teacher_id.clone()));
        self.check_fault(&update.teacher_id)?;
        let mut teachers = self.teachers.write();
        let slot = teachers
            .iter_mut()
            .find(|t| t.teacher_id == update.teacher_id)
            .ok_or_else(|| StoreError::NotFound(update.teacher_id.clone()))?;
        let password = slot.password.take();
        *slot = Teacher {
            password,
            ..Teacher::from(update)
        };
        Ok(())
    }

    /// Removes a teacher.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown identifier.
    pub fn delete(&self, teacher_id: &str) -> Result<(), StoreError> {
        self.record(StoreCall::Delete(teacher_id.to_string()));
        self.check_fault(teacher_id)?;
        let mut teachers = self.teachers.write();
        let before = teachers.len();
        teachers.retain(|t| t.teacher_id != teacher_id);
        if teachers.len() == before {
            return Err(StoreError::NotFound(teacher_id.to_string()));
        }
        Ok(())
    }
}

/// A small roster for local development, in server order.
#[must_use]
pub fn demo_roster() -> Vec<Teacher> {
    let row = |id: &str, last: &str, first: &str, course: &str, section: &str, subject: &str| {
        Teacher {
            teacher_id: id.to_string(),
            lastname: last.to_string(),
            firstname: first.to_string(),
            teacher_email: format!("{}.{}@comlab.edu", first.to_lowercase(), last.to_lowercase()),
            courses: vec![course.to_string()],
            sections: vec![section.to_string()],
            subjects: vec![subject.to_string()],
            password: None,
        }
    };
    vec![
        row("2021-00001", "Santos", "Maria", "BSIS", "4A", "Programming"),
        row("2021-00002", "Reyes", "Jose", "BSAIS", "4B", "Database Management"),
        row("2021-00003", "Cruz", "Ana", "BSOM", "4C", "Web Development"),
        row("2021-00004", "Bautista", "Paolo", "BSIS", "4D", "Programming"),
        row("2021-00005", "Garcia", "Liza", "BSIS", "4A", "Web Development"),
        row("2021-00006", "Mendoza", "Carlo", "BSAIS", "4B", "Database Management"),
        row("2021-00007", "Torres", "Bea", "BSOM", "4C", "Programming"),
        row("2021-00008", "Villanueva", "Rico", "BSIS", "4D", "Web Development"),
        row("2021-00009", "Ramos", "Joy", "BSAIS", "4A", "Programming"),
        row("2021-00010", "Aquino", "Mark", "BSOM", "4B", "Database Management"),
        row("2021-00011", "Flores", "Nina", "BSIS", "4C", "Web Development"),
        row("2021-00012", "Castillo", "Ben", "BSAIS", "4D", "Programming"),
    ]
}

fn status_error(endpoint: &str, err: &StoreError) -> ApiError {
    ApiError::Status {
        endpoint: endpoint.to_string(),
        status: err.status_code(),
    }
}

/// Direct in-process access, answering the way the HTTP server would.
#[async_trait]
impl RosterApi for RosterStore {
    async fn list_teachers(&self) -> Result<Vec<Teacher>, ApiError> {
        self.list()
            .map_err(|e| status_error(endpoints::LIST_TEACHERS, &e))
    }

    async fn create_teacher(&self, teacher: &NewTeacher) -> Result<(), ApiError> {
        self.create(teacher.clone())
            .map_err(|e| status_error(endpoints::ADD_TEACHER, &e))
    }

    async fn update_teacher(&self, update: &TeacherUpdate) -> Result<(), ApiError> {
        self.update(update.clone())
            .map_err(|e| status_error(endpoints::EDIT_TEACHER, &e))
    }

    async fn delete_teacher(&self, teacher_id: &str) -> Result<(), ApiError> {
        self.delete(teacher_id)
            .map_err(|e| status_error(endpoints::DELETE_TEACHER, &e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teacher(id: &str, last: &str) -> Teacher {
        Teacher {
            teacher_id: id.to_string(),
            lastname: last.to_string(),
            firstname: "F".to_string(),
            teacher_email: "f@school.edu".to_string(),
            courses: vec!["BSIS".to_string()],
            sections: vec!["4A".to_string()],
            subjects: vec!["Programming".to_string()],
            password: Some("pw".to_string()),
        }
    }

    #[test]
    fn list_preserves_insertion_order() {
        let store = RosterStore::with_teachers(vec![teacher("b", "B"), teacher("a", "A")]);
        let ids: Vec<_> = store.list().unwrap().into_iter().map(|t| t.teacher_id).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(store.calls(), vec![StoreCall::List]);
    }

    #[test]
    fn update_keeps_position_and_password() {
        let store = RosterStore::with_teachers(vec![teacher("a", "A"), teacher("b", "B")]);
        store
            .update(TeacherUpdate {
                teacher_id: "a".to_string(),
                teacher_email: "new@school.edu".to_string(),
                lastname: "Z".to_string(),
                firstname: "F".to_string(),
                courses: vec![],
                sections: vec![],
                subjects: vec![],
            })
            .unwrap();
        let list = store.list().unwrap();
        assert_eq!(list[0].lastname, "Z");
        assert_eq!(list[0].password.as_deref(), Some("pw"));
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let store = RosterStore::new();
        assert_eq!(store.delete("x"), Err(StoreError::NotFound("x".to_string())));
        assert_eq!(StoreError::NotFound("x".to_string()).status_code(), 404);
    }

    #[test]
    fn create_rejects_duplicates() {
        let store = RosterStore::with_teachers(vec![teacher("a", "A")]);
        let dup = NewTeacher {
            teacher_id: "a".to_string(),
            teacher_email: "a@school.edu".to_string(),
            lastname: "A".to_string(),
            firstname: "A".to_string(),
            courses: vec![],
            sections: vec![],
            subjects: vec![],
            password: None,
        };
        assert_eq!(store.create(dup), Err(StoreError::Conflict("a".to_string())));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn injected_faults_fail_without_mutation() {
        let store = RosterStore::with_teachers(vec![teacher("a", "A")]);
        store.fail_id("a");
        store.fail_id("b");
        assert_eq!(store.delete("a"), Err(StoreError::Injected));
        assert_eq!(store.len(), 1);
        let new = NewTeacher {
            teacher_id: "b".to_string(),
            teacher_email: "b@school.edu".to_string(),
            lastname: "B".to_string(),
            firstname: "B".to_string(),
            courses: vec![],
            sections: vec![],
            subjects: vec![],
            password: None,
        };
        assert_eq!(store.create(new), Err(StoreError::Injected));
        assert_eq!(store.len(), 1);

        store.fail_list(true);
        assert!(store.list().is_err());
        store.clear_faults();
        assert!(store.list().is_ok());
        assert!(store.delete("a").is_ok());
        assert!(store.is_empty());
    }

    #[test]
    fn demo_roster_has_unique_valid_ids() {
        let roster = demo_roster();
        let ids: HashSet<_> = roster.iter().map(|t| t.teacher_id.as_str()).collect();
        assert_eq!(ids.len(), roster.len());
        assert!(roster.iter().all(|t| t.teacher_id.len() >= 10));
    }

    #[tokio::test]
    async fn roster_api_maps_store_errors_to_status() {
        let store = RosterStore::new();
        let err = store.delete_teacher("missing").await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                endpoint: "/teacher/deleteTeacher".to_string(),
                status: 404
            }
        );
    }
}
