use serde::{Deserialize, Serialize};

/// A faculty member as stored by the remote roster API.
///
/// Field names follow the API's JSON wire format exactly. The roster API owns
/// these records; clients only hold read-through copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    /// Externally assigned identifier. Opaque and unique within a roster.
    pub teacher_id: String,
    /// Family name; the default sort and filter column.
    pub lastname: String,
    /// Given name.
    pub firstname: String,
    /// Contact email address.
    pub teacher_email: String,
    /// Degree programs the teacher is assigned to.
    #[serde(default)]
    pub courses: Vec<String>,
    /// Class sections the teacher handles.
    #[serde(default)]
    pub sections: Vec<String>,
    /// Subjects the teacher is qualified for.
    #[serde(default)]
    pub subjects: Vec<String>,
    /// Login secret. Present on some API responses; never displayed and never
    /// sent back on the edit path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Body of `POST /teacher/editTeacher`.
///
/// Carries every editable field; the identifier doubles as the update key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherUpdate {
    pub teacher_id: String,
    pub teacher_email: String,
    pub lastname: String,
    pub firstname: String,
    pub courses: Vec<String>,
    pub sections: Vec<String>,
    pub subjects: Vec<String>,
}

/// Body of `POST /teacher/addTeacher`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTeacher {
    pub teacher_id: String,
    pub teacher_email: String,
    pub lastname: String,
    pub firstname: String,
    pub courses: Vec<String>,
    pub sections: Vec<String>,
    pub subjects: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl From<TeacherUpdate> for Teacher {
    fn from(update: TeacherUpdate) -> Self {
        Self {
            teacher_id: update.teacher_id,
            lastname: update.lastname,
            firstname: update.firstname,
            teacher_email: update.teacher_email,
            courses: update.courses,
            sections: update.sections,
            subjects: update.subjects,
            password: None,
        }
    }
}

impl From<NewTeacher> for Teacher {
    fn from(new: NewTeacher) -> Self {
        Self {
            teacher_id: new.teacher_id,
            lastname: new.lastname,
            firstname: new.firstname,
            teacher_email: new.teacher_email,
            courses: new.courses,
            sections: new.sections,
            subjects: new.subjects,
            password: new.password,
        }
    }
}

/// The fixed option lists offered by the roster forms' multi-select inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionCatalog {
    pub courses: Vec<String>,
    pub sections: Vec<String>,
    pub subjects: Vec<String>,
}

impl Default for OptionCatalog {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| (*s).to_string()).collect()
        }

        Self {
            courses: owned(&["BSIS", "BSAIS", "BSOM"]),
            sections: owned(&["4A", "4B", "4C", "4D"]),
            subjects: owned(&["Programming", "Database Management", "Web Development"]),
        }
    }
}
