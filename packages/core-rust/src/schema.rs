//! Declarative validation rules for teacher drafts.
//!
//! A [`DraftSchema`] is plain data: a list of [`FieldDef`]s, each carrying the
//! [`Rule`]s for one field along with the message shown when the rule fails.
//! One interpreter ([`DraftSchema::validate`]) evaluates any schema against any
//! [`DraftFields`] implementor, so each rule is testable on its own.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::draft::{DraftField, DraftFields, FieldValue};
use crate::types::OptionCatalog;

// Literal pattern, compiled by the `email_syntax` test.
// Local part: no leading dot, no "..", last char not a dot. Domain: one or more
// labels followed by an alphabetic TLD of at least two letters.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$",
    )
    .expect("email pattern compiles")
});

/// Returns whether `value` is a syntactically valid email address.
///
/// # Panics
///
/// Never in practice: the only panic site is compiling the literal email
/// pattern, which is exercised by this module's tests.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && EMAIL_PATTERN.is_match(value)
}

/// A single constraint on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
    /// Text must have at least `min` UTF-16 code units, the length a
    /// browser form reports.
    MinLength { min: usize, message: String },
    /// Text must be a syntactically valid email address.
    Email { message: String },
    /// List must contain at least `min` values.
    MinItems { min: usize, message: String },
    /// Every value must be one of `options`.
    OneOf {
        options: Vec<String>,
        message: String,
    },
}

impl Rule {
    /// Evaluates the rule, returning its message when violated.
    ///
    /// Rules that do not apply to the value's shape (e.g. `MinItems` on text)
    /// never fail.
    #[must_use]
    pub fn check(&self, value: FieldValue<'_>) -> Option<&str> {
        let ok = match (self, value) {
            (Self::MinLength { min, .. }, FieldValue::Text(text)) => {
                text.encode_utf16().count() >= *min
            }
            (Self::Email { .. }, FieldValue::Text(text)) => is_valid_email(text),
            (Self::MinItems { min, .. }, FieldValue::List(items)) => items.len() >= *min,
            (Self::OneOf { options, .. }, FieldValue::List(items)) => {
                items.iter().all(|item| options.contains(item))
            }
            (Self::OneOf { options, .. }, FieldValue::Text(text)) => {
                options.iter().any(|option| option == text)
            }
            _ => true,
        };
        if ok {
            None
        } else {
            Some(self.message())
        }
    }

    /// The message reported when this rule fails.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::MinLength { message, .. }
            | Self::Email { message }
            | Self::MinItems { message, .. }
            | Self::OneOf { message, .. } => message,
        }
    }
}

/// Rules attached to one draft field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// The field the rules apply to.
    pub field: DraftField,
    /// Rules evaluated in order; every failing rule is reported.
    pub rules: Vec<Rule>,
}

/// A failed rule on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: DraftField,
    pub message: String,
}

/// Result of validating a draft against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// The draft conforms to the schema.
    Valid,
    /// The draft violates one or more rules.
    Invalid {
        /// Every failing rule, grouped by field in schema order.
        errors: Vec<FieldError>,
    },
}

impl ValidationResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// All field errors; empty when valid.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::Valid => &[],
            Self::Invalid { errors } => errors,
        }
    }

    /// First message for `field`, which is what a form shows under the input.
    #[must_use]
    pub fn first_error(&self, field: DraftField) -> Option<&str> {
        self.errors()
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

/// Ordered set of field definitions for a teacher draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSchema {
    pub fields: Vec<FieldDef>,
}

impl DraftSchema {
    /// The roster form's rules: ID of at least 10 characters, a non-empty valid
    /// email, both names present, and at least one course, section and subject.
    #[must_use]
    pub fn teacher() -> Self {
        fn text(min: usize, message: &str) -> Rule {
            Rule::MinLength {
                min,
                message: message.to_string(),
            }
        }
        fn items(message: &str) -> Rule {
            Rule::MinItems {
                min: 1,
                message: message.to_string(),
            }
        }

        Self {
            fields: vec![
                FieldDef {
                    field: DraftField::TeacherId,
                    rules: vec![text(10, "ID must have at least 10 characters")],
                },
                FieldDef {
                    field: DraftField::TeacherEmail,
                    rules: vec![
                        Rule::Email {
                            message: "Invalid email address".to_string(),
                        },
                        text(1, "Email is required"),
                    ],
                },
                FieldDef {
                    field: DraftField::Lastname,
                    rules: vec![text(1, "Last Name is required")],
                },
                FieldDef {
                    field: DraftField::Firstname,
                    rules: vec![text(1, "First Name is required")],
                },
                FieldDef {
                    field: DraftField::Courses,
                    rules: vec![items("At least one course is required")],
                },
                FieldDef {
                    field: DraftField::Sections,
                    rules: vec![items("At least one section is required")],
                },
                FieldDef {
                    field: DraftField::Subjects,
                    rules: vec![items("At least one subject is required")],
                },
            ],
        }
    }

    /// Adds rules restricting courses, sections and subjects to `catalog`.
    #[must_use]
    pub fn with_catalog(mut self, catalog: &OptionCatalog) -> Self {
        let lists = [
            (DraftField::Courses, &catalog.courses, "course"),
            (DraftField::Sections, &catalog.sections, "section"),
            (DraftField::Subjects, &catalog.subjects, "subject"),
        ];
        for (field, options, noun) in lists {
            let rule = Rule::OneOf {
                options: options.clone(),
                message: format!("Unknown {noun} selected"),
            };
            if let Some(def) = self.fields.iter_mut().find(|d| d.field == field) {
                def.rules.push(rule);
            } else {
                self.fields.push(FieldDef {
                    field,
                    rules: vec![rule],
                });
            }
        }
        self
    }

    /// Evaluates every rule of every field against `draft`.
    #[must_use]
    pub fn validate(&self, draft: &impl DraftFields) -> ValidationResult {
        let errors: Vec<FieldError> = self
            .fields
            .iter()
            .flat_map(|def| {
                let value = draft.field(def.field);
                def.rules.iter().filter_map(move |rule| {
                    rule.check(value).map(|message| FieldError {
                        field: def.field,
                        message: message.to_string(),
                    })
                })
            })
            .collect();

        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { errors }
        }
    }
}

impl Default for DraftSchema {
    fn default() -> Self {
        Self::teacher()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::EditDraft;

    fn valid_draft() -> EditDraft {
        EditDraft {
            teacher_id: "2021-00001".to_string(),
            teacher_email: "ana.reyes@school.edu".to_string(),
            lastname: "Reyes".to_string(),
            firstname: "Ana".to_string(),
            courses: vec!["BSIS".to_string()],
            sections: vec!["4A".to_string()],
            subjects: vec!["Programming".to_string()],
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert_eq!(DraftSchema::teacher().validate(&valid_draft()), ValidationResult::Valid);
    }

    #[test]
    fn nine_character_id_is_rejected() {
        let draft = EditDraft {
            teacher_id: "123456789".to_string(),
            ..valid_draft()
        };
        let result = DraftSchema::teacher().validate(&draft);
        assert_eq!(
            result.first_error(DraftField::TeacherId),
            Some("ID must have at least 10 characters")
        );
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn ten_character_id_is_accepted() {
        let draft = EditDraft {
            teacher_id: "1234567890".to_string(),
            ..valid_draft()
        };
        assert!(DraftSchema::teacher().validate(&draft).is_valid());
    }

    #[test]
    fn id_length_counts_utf16_code_units() {
        // The emoji is one char but two UTF-16 units, so this ID has length 10.
        let draft = EditDraft {
            teacher_id: "12345678\u{1F600}".to_string(),
            ..valid_draft()
        };
        assert!(DraftSchema::teacher().validate(&draft).is_valid());

        let short = EditDraft {
            teacher_id: "1234567\u{1F600}".to_string(),
            ..valid_draft()
        };
        assert_eq!(
            DraftSchema::teacher()
                .validate(&short)
                .first_error(DraftField::TeacherId),
            Some("ID must have at least 10 characters")
        );
    }

    #[test]
    fn empty_email_reports_both_rules() {
        let draft = EditDraft {
            teacher_email: String::new(),
            ..valid_draft()
        };
        let result = DraftSchema::teacher().validate(&draft);
        let messages: Vec<_> = result.errors().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["Invalid email address", "Email is required"]);
        assert_eq!(
            result.first_error(DraftField::TeacherEmail),
            Some("Invalid email address")
        );
    }

    #[test]
    fn empty_lists_and_names_are_reported_per_field() {
        let draft = EditDraft {
            lastname: String::new(),
            firstname: String::new(),
            courses: vec![],
            sections: vec![],
            subjects: vec![],
            ..valid_draft()
        };
        let result = DraftSchema::teacher().validate(&draft);
        assert_eq!(result.first_error(DraftField::Lastname), Some("Last Name is required"));
        assert_eq!(result.first_error(DraftField::Firstname), Some("First Name is required"));
        assert_eq!(
            result.first_error(DraftField::Courses),
            Some("At least one course is required")
        );
        assert_eq!(
            result.first_error(DraftField::Sections),
            Some("At least one section is required")
        );
        assert_eq!(
            result.first_error(DraftField::Subjects),
            Some("At least one subject is required")
        );
        assert_eq!(result.errors().len(), 5);
    }

    #[test]
    fn email_syntax() {
        for ok in [
            "a@b.co",
            "first.last@school.edu",
            "o'neil+lab@mail.example.org",
            "x_y-z@sub-domain.example.ph",
        ] {
            assert!(is_valid_email(ok), "{ok} should be valid");
        }
        for bad in [
            "",
            "plain",
            "@school.edu",
            ".lead@school.edu",
            "trail.@school.edu",
            "dou..ble@school.edu",
            "a@b",
            "a@b.c",
            "a@-b.com",
            "a b@school.edu",
        ] {
            assert!(!is_valid_email(bad), "{bad} should be invalid");
        }
    }

    #[test]
    fn rule_shape_mismatch_never_fails() {
        let rule = Rule::MinItems {
            min: 3,
            message: "x".to_string(),
        };
        assert_eq!(rule.check(FieldValue::Text("")), None);
    }

    #[test]
    fn catalog_rule_is_opt_in() {
        let draft = EditDraft {
            courses: vec!["BSCS".to_string()],
            ..valid_draft()
        };
        assert!(DraftSchema::teacher().validate(&draft).is_valid());

        let strict = DraftSchema::teacher().with_catalog(&OptionCatalog::default());
        let result = strict.validate(&draft);
        assert_eq!(
            result.first_error(DraftField::Courses),
            Some("Unknown course selected")
        );
    }

    #[test]
    fn schema_round_trips_through_json() {
        let schema = DraftSchema::teacher();
        let json = serde_json::to_string(&schema).unwrap();
        let back: DraftSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, back);
    }
}
