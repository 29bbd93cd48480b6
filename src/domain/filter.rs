//! Values offered by the table's filter dropdowns.

use serde::{Deserialize, Serialize};

/// Sentinel used by the filter dropdowns for "no constraint".
pub const ALL_OPTION: &str = "all";

/// Response of `GET /api/filter-options`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterOptions {
    #[serde(default)]
    pub genders: Vec<String>,
    #[serde(default)]
    pub age_groups: Vec<String>,
    #[serde(default)]
    pub rws: Vec<String>,
}

/// Normalizes a dropdown value: the `"all"` sentinel and blank values mean
/// "no constraint".
pub fn constraint(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == ALL_OPTION {
        None
    } else {
        Some(trimmed.to_string())
    }
}
