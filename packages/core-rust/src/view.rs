//! Client-side table state for the roster and its pure projection.
//!
//! [`ViewState`] is the whole of the table's display configuration: sort,
//! last-name filter, pagination and column visibility. [`project`] turns a
//! roster plus a view state plus a selection into the rows that should be on
//! screen. Nothing here touches the network or mutates the roster.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::selection::SelectionSet;
use crate::types::Teacher;

/// Rows per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Data columns of the roster table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    TeacherId,
    Lastname,
    Firstname,
    TeacherEmail,
    Subjects,
    Courses,
    Sections,
}

impl Column {
    /// Table columns in display order.
    pub const ALL: [Column; 7] = [
        Column::TeacherId,
        Column::Lastname,
        Column::Firstname,
        Column::TeacherEmail,
        Column::Subjects,
        Column::Courses,
        Column::Sections,
    ];

    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Self::TeacherId => "ID",
            Self::Lastname => "Last Name",
            Self::Firstname => "First Name",
            Self::TeacherEmail => "Email",
            Self::Subjects => "Subjects",
            Self::Courses => "Courses",
            Self::Sections => "Sections",
        }
    }

    /// Last name carries the filter input and cannot be hidden.
    #[must_use]
    pub fn is_hideable(self) -> bool {
        self != Self::Lastname
    }

    /// Text rendering of the column for `teacher`. List columns are joined
    /// with `", "`, which is also what they sort by.
    #[must_use]
    pub fn text(self, teacher: &Teacher) -> String {
        match self {
            Self::TeacherId => teacher.teacher_id.clone(),
            Self::Lastname => teacher.lastname.clone(),
            Self::Firstname => teacher.firstname.clone(),
            Self::TeacherEmail => teacher.teacher_email.clone(),
            Self::Subjects => teacher.subjects.join(", "),
            Self::Courses => teacher.courses.join(", "),
            Self::Sections => teacher.sections.join(", "),
        }
    }

    /// Case-sensitive byte-wise comparison of two rows on this column.
    #[must_use]
    pub fn compare(self, a: &Teacher, b: &Teacher) -> Ordering {
        match self {
            Self::TeacherId => a.teacher_id.cmp(&b.teacher_id),
            Self::Lastname => a.lastname.cmp(&b.lastname),
            Self::Firstname => a.firstname.cmp(&b.firstname),
            Self::TeacherEmail => a.teacher_email.cmp(&b.teacher_email),
            Self::Subjects | Self::Courses | Self::Sections => self.text(a).cmp(&self.text(b)),
        }
    }
}

impl std::str::FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "id" | "teacher_id" => Ok(Self::TeacherId),
            "lastname" | "last_name" | "last" => Ok(Self::Lastname),
            "firstname" | "first_name" | "first" => Ok(Self::Firstname),
            "email" | "teacher_email" => Ok(Self::TeacherEmail),
            "subjects" => Ok(Self::Subjects),
            "courses" => Ok(Self::Courses),
            "sections" => Ok(Self::Sections),
            other => Err(format!("unknown column: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: Column,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: Column::Lastname,
            direction: SortDirection::Ascending,
        }
    }
}

/// Display configuration of the roster table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub sort: SortState,
    /// Case-insensitive substring matched against last names. Empty matches all.
    pub filter: String,
    pub page_index: usize,
    pub page_size: usize,
    pub hidden_columns: BTreeSet<Column>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            sort: SortState::default(),
            filter: String::new(),
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            hidden_columns: BTreeSet::new(),
        }
    }
}

impl ViewState {
    /// Header click: a new column sorts ascending, the active ascending column
    /// flips to descending, anything else goes back to ascending.
    pub fn toggle_sort(&mut self, column: Column) {
        let descending =
            self.sort.column == column && self.sort.direction == SortDirection::Ascending;
        self.sort = SortState {
            column,
            direction: if descending {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            },
        };
    }

    /// Replaces the filter term and returns to the first page.
    pub fn set_filter(&mut self, term: impl Into<String>) {
        self.filter = term.into();
        self.page_index = 0;
    }

    /// Sets the page size (at least one row) and returns to the first page.
    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.page_index = 0;
    }

    /// Hides or shows `column`. Returns `false` if the column cannot be hidden.
    pub fn set_column_visible(&mut self, column: Column, visible: bool) -> bool {
        if !column.is_hideable() {
            return false;
        }
        if visible {
            self.hidden_columns.remove(&column);
        } else {
            self.hidden_columns.insert(column);
        }
        true
    }

    /// Columns to render, in display order.
    #[must_use]
    pub fn visible_columns(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|c| !self.hidden_columns.contains(c))
            .collect()
    }

    /// Whether `teacher` passes the last-name filter.
    #[must_use]
    pub fn matches(&self, teacher: &Teacher) -> bool {
        self.filter.is_empty()
            || teacher
                .lastname
                .to_lowercase()
                .contains(&self.filter.to_lowercase())
    }
}

/// Checkbox state of the "select all on this page" header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSelection {
    None,
    Some,
    All,
}

/// One on-screen row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewRow<'a> {
    pub teacher: &'a Teacher,
    pub selected: bool,
}

/// Everything the roster table needs to render one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterView<'a> {
    /// Rows of the current page, filtered and sorted.
    pub rows: Vec<ViewRow<'a>>,
    pub columns: Vec<Column>,
    pub sort: SortState,
    /// Rows in the roster before filtering.
    pub total_count: usize,
    /// Rows passing the filter, across all pages.
    pub filtered_count: usize,
    /// Selected rows among the filtered rows.
    pub selected_count: usize,
    /// Current page after clamping to the available pages.
    pub page_index: usize,
    pub page_count: usize,
    pub can_previous: bool,
    pub can_next: bool,
    pub page_selection: PageSelection,
}

impl RosterView<'_> {
    /// Identifiers of the rows on the current page.
    #[must_use]
    pub fn page_ids(&self) -> Vec<&str> {
        self.rows
            .iter()
            .map(|r| r.teacher.teacher_id.as_str())
            .collect()
    }

    /// Footer text, e.g. `"2 of 14 row(s) selected."`.
    #[must_use]
    pub fn selection_summary(&self) -> String {
        format!(
            "{} of {} row(s) selected.",
            self.selected_count, self.filtered_count
        )
    }
}

/// Filters `roster` by the view's last-name term, preserving roster order.
#[must_use]
pub fn filter_rows<'a>(roster: &'a [Teacher], state: &ViewState) -> Vec<&'a Teacher> {
    roster.iter().filter(|t| state.matches(t)).collect()
}

/// Stable sort of `rows` by the view's sort state.
///
/// Descending reverses the comparison rather than the output, so rows that
/// compare equal keep their incoming order in both directions.
pub fn sort_rows(rows: &mut [&Teacher], sort: SortState) {
    rows.sort_by(|a, b| {
        let cmp = sort.column.compare(a, b);
        match sort.direction {
            SortDirection::Ascending => cmp,
            SortDirection::Descending => cmp.reverse(),
        }
    });
}

/// Projects the roster through filter, sort and pagination.
#[must_use]
pub fn project<'a>(
    roster: &'a [Teacher],
    state: &ViewState,
    selection: &SelectionSet,
) -> RosterView<'a> {
    let mut filtered = filter_rows(roster, state);
    sort_rows(&mut filtered, state.sort);

    let page_size = state.page_size.max(1);
    let filtered_count = filtered.len();
    let page_count = filtered_count.div_ceil(page_size);
    let page_index = state.page_index.min(page_count.saturating_sub(1));

    let selected_count = filtered
        .iter()
        .filter(|t| selection.contains(&t.teacher_id))
        .count();

    let rows: Vec<ViewRow<'a>> = filtered
        .into_iter()
        .skip(page_index * page_size)
        .take(page_size)
        .map(|teacher| ViewRow {
            selected: selection.contains(&teacher.teacher_id),
            teacher,
        })
        .collect();

    let on_page = rows.iter().filter(|r| r.selected).count();
    let page_selection = if rows.is_empty() || on_page == 0 {
        PageSelection::None
    } else if on_page == rows.len() {
        PageSelection::All
    } else {
        PageSelection::Some
    };

    RosterView {
        rows,
        columns: state.visible_columns(),
        sort: state.sort,
        total_count: roster.len(),
        filtered_count,
        selected_count,
        page_index,
        page_count,
        can_previous: page_index > 0,
        can_next: page_index + 1 < page_count,
        page_selection,
    }
}
