//! Computer Lab Management core: teacher roster model, draft schema and the
//! table view projection.

pub mod draft;
pub mod error;
pub mod notice;
pub mod schema;
pub mod selection;
pub mod traits;
pub mod types;
pub mod view;

pub use draft::{DraftField, DraftFields, EditDraft, FieldValue, NewTeacherDraft};
pub use error::{ApiError, UnknownTeacher};
pub use notice::{Notice, NoticeLevel};
pub use schema::{DraftSchema, FieldDef, FieldError, Rule, ValidationResult};
pub use selection::SelectionSet;
pub use traits::RosterApi;
pub use types::{NewTeacher, OptionCatalog, Teacher, TeacherUpdate};
pub use view::{
    project, Column, PageSelection, RosterView, SortDirection, SortState, ViewRow, ViewState,
};
