use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::domain::filter::constraint;
use crate::domain::types::{PageSize, SortDirection, SortField, TypeConstraintError};
use crate::repository::LansiaListQuery;

/// Dropdown filters of the resident table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterDimension {
    Gender,
    AgeGroup,
    Rw,
}

impl FilterDimension {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::AgeGroup => "age_group",
            Self::Rw => "rw",
        }
    }
}

impl Display for FilterDimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterDimension {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "gender" => Ok(Self::Gender),
            "age" | "age_group" => Ok(Self::AgeGroup),
            "rw" => Ok(Self::Rw),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

/// Everything the user chose that shapes the list request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryState {
    /// Text as typed, updated on every keystroke.
    pub search_text: String,
    /// Debounced search term actually sent to the backend.
    pub search_term: String,
    pub gender: Option<String>,
    pub age_group: Option<String>,
    pub rw: Option<String>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    /// One-based.
    pub page: usize,
    pub page_size: PageSize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            search_term: String::new(),
            gender: None,
            age_group: None,
            rw: None,
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
            page: 1,
            page_size: PageSize::default(),
        }
    }
}

impl QueryState {
    pub fn filter(&self, dimension: FilterDimension) -> Option<&str> {
        match dimension {
            FilterDimension::Gender => self.gender.as_deref(),
            FilterDimension::AgeGroup => self.age_group.as_deref(),
            FilterDimension::Rw => self.rw.as_deref(),
        }
    }

    /// Stores a dropdown value. Returns `true` when the constraint changed.
    pub fn set_filter(&mut self, dimension: FilterDimension, value: &str) -> bool {
        let slot = match dimension {
            FilterDimension::Gender => &mut self.gender,
            FilterDimension::AgeGroup => &mut self.age_group,
            FilterDimension::Rw => &mut self.rw,
        };
        let value = constraint(value);
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    /// Clicking the current column flips the direction; another column is
    /// adopted ascending.
    pub fn apply_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Ascending;
        }
    }

    pub fn clear_search_and_filters(&mut self) {
        self.search_text.clear();
        self.search_term.clear();
        self.gender = None;
        self.age_group = None;
        self.rw = None;
    }

    pub fn to_list_query(&self) -> LansiaListQuery {
        LansiaListQuery::new()
            .search(&self.search_term)
            .gender(self.filter(FilterDimension::Gender).unwrap_or_default())
            .age_group(self.filter(FilterDimension::AgeGroup).unwrap_or_default())
            .rw(self.filter(FilterDimension::Rw).unwrap_or_default())
            .sort(self.sort_field, self.sort_direction)
            .paginate(self.page, self.page_size.get())
    }
}
