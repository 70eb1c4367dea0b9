//! Row selection for bulk actions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::UnknownTeacher;
use crate::types::Teacher;

/// Identifiers of the rows chosen for a bulk action.
///
/// Every member refers to a teacher in the roster the set was built against.
/// The set is keyed by `teacher_id`, not row position, so sorting and
/// filtering never change what is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    ids: BTreeSet<String>,
}

fn ensure_present(roster: &[Teacher], id: &str) -> Result<(), UnknownTeacher> {
    if roster.iter().any(|t| t.teacher_id == id) {
        Ok(())
    } else {
        Err(UnknownTeacher(id.to_string()))
    }
}

impl SelectionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected identifiers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Adds `id` to the selection.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownTeacher`] if `id` is not in `roster`.
    pub fn select(&mut self, roster: &[Teacher], id: &str) -> Result<(), UnknownTeacher> {
        ensure_present(roster, id)?;
        self.ids.insert(id.to_string());
        Ok(())
    }

    /// Removes `id`; returns whether it was selected.
    pub fn deselect(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    /// Flips `id` and returns its new state.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownTeacher`] if `id` is not in `roster`.
    pub fn toggle(&mut self, roster: &[Teacher], id: &str) -> Result<bool, UnknownTeacher> {
        if self.ids.remove(id) {
            return Ok(false);
        }
        self.select(roster, id)?;
        Ok(true)
    }

    /// Selects or deselects every id in `ids` (the header checkbox).
    ///
    /// # Errors
    ///
    /// Returns [`UnknownTeacher`] for the first id missing from `roster`;
    /// the selection is left unchanged in that case.
    pub fn set_many<'a>(
        &mut self,
        roster: &[Teacher],
        ids: impl IntoIterator<Item = &'a str>,
        selected: bool,
    ) -> Result<(), UnknownTeacher> {
        let ids: Vec<&str> = ids.into_iter().collect();
        if selected {
            for id in &ids {
                ensure_present(roster, id)?;
            }
            self.ids.extend(ids.iter().map(|id| (*id).to_string()));
        } else {
            for id in ids {
                self.ids.remove(id);
            }
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
