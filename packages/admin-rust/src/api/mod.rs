//! Roster API endpoints and the HTTP client implementation.

pub mod http;

pub use http::HttpRosterApi;

/// Endpoint paths relative to the API root.
pub mod endpoints {
    /// `GET`: full roster as a JSON array.
    pub const LIST_TEACHERS: &str = "/teacher/getTeachers";
    /// `POST`: create a teacher.
    pub const ADD_TEACHER: &str = "/teacher/addTeacher";
    /// `POST`: update a teacher keyed by `teacher_id`.
    pub const EDIT_TEACHER: &str = "/teacher/editTeacher";
    /// `DELETE`: followed by `/{teacher_id}`.
    pub const DELETE_TEACHER: &str = "/teacher/deleteTeacher";
}
