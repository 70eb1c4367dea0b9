//! Working copies of teacher records while an edit or create form is open.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::{DraftSchema, ValidationResult};
use crate::types::{NewTeacher, Teacher, TeacherUpdate};

/// Editable fields of a teacher form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    TeacherId,
    TeacherEmail,
    Lastname,
    Firstname,
    Subjects,
    Courses,
    Sections,
}

impl DraftField {
    /// Every field, in the order the edit form lays them out.
    pub const ALL: [DraftField; 7] = [
        DraftField::TeacherId,
        DraftField::TeacherEmail,
        DraftField::Lastname,
        DraftField::Firstname,
        DraftField::Subjects,
        DraftField::Courses,
        DraftField::Sections,
    ];

    /// JSON wire name of the field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TeacherId => "teacher_id",
            Self::TeacherEmail => "teacher_email",
            Self::Lastname => "lastname",
            Self::Firstname => "firstname",
            Self::Subjects => "subjects",
            Self::Courses => "courses",
            Self::Sections => "sections",
        }
    }

    /// Form label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::TeacherId => "ID",
            Self::TeacherEmail => "Email",
            Self::Lastname => "Last Name",
            Self::Firstname => "First Name",
            Self::Subjects => "Subjects",
            Self::Courses => "Courses",
            Self::Sections => "Sections",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Borrowed view of one draft field, as seen by schema rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    List(&'a [String]),
}

/// Anything a [`DraftSchema`] can validate.
pub trait DraftFields {
    /// Returns the current value of `field`.
    fn field(&self, field: DraftField) -> FieldValue<'_>;
}

/// Transient copy of a teacher's editable fields.
///
/// Created when an edit begins, discarded on successful submit or cancel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditDraft {
    pub teacher_id: String,
    pub teacher_email: String,
    pub lastname: String,
    pub firstname: String,
    pub courses: Vec<String>,
    pub sections: Vec<String>,
    pub subjects: Vec<String>,
}

impl EditDraft {
    /// Pre-populates a draft from a cached record.
    #[must_use]
    pub fn from_teacher(teacher: &Teacher) -> Self {
        Self {
            teacher_id: teacher.teacher_id.clone(),
            teacher_email: teacher.teacher_email.clone(),
            lastname: teacher.lastname.clone(),
            firstname: teacher.firstname.clone(),
            courses: teacher.courses.clone(),
            sections: teacher.sections.clone(),
            subjects: teacher.subjects.clone(),
        }
    }

    /// Validates the draft against `schema`.
    #[must_use]
    pub fn validate(&self, schema: &DraftSchema) -> ValidationResult {
        schema.validate(self)
    }

    /// Converts the draft into the update request body.
    #[must_use]
    pub fn into_update(self) -> TeacherUpdate {
        TeacherUpdate {
            teacher_id: self.teacher_id,
            teacher_email: self.teacher_email,
            lastname: self.lastname,
            firstname: self.firstname,
            courses: self.courses,
            sections: self.sections,
            subjects: self.subjects,
        }
    }
}

impl DraftFields for EditDraft {
    fn field(&self, field: DraftField) -> FieldValue<'_> {
        match field {
            DraftField::TeacherId => FieldValue::Text(&self.teacher_id),
            DraftField::TeacherEmail => FieldValue::Text(&self.teacher_email),
            DraftField::Lastname => FieldValue::Text(&self.lastname),
            DraftField::Firstname => FieldValue::Text(&self.firstname),
            DraftField::Courses => FieldValue::List(&self.courses),
            DraftField::Sections => FieldValue::List(&self.sections),
            DraftField::Subjects => FieldValue::List(&self.subjects),
        }
    }
}

/// Draft behind the "add teacher" form: the editable fields plus an optional
/// initial password.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTeacherDraft {
    #[serde(flatten)]
    pub fields: EditDraft,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl NewTeacherDraft {
    #[must_use]
    pub fn validate(&self, schema: &DraftSchema) -> ValidationResult {
        schema.validate(&self.fields)
    }

    /// Converts the draft into the create request body.
    #[must_use]
    pub fn into_new_teacher(self) -> NewTeacher {
        let EditDraft {
            teacher_id,
            teacher_email,
            lastname,
            firstname,
            courses,
            sections,
            subjects,
        } = self.fields;
        NewTeacher {
            teacher_id,
            teacher_email,
            lastname,
            firstname,
            courses,
            sections,
            subjects,
            password: self.password.filter(|p| !p.is_empty()),
        }
    }
}
