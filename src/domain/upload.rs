//! Outcome of a bulk spreadsheet import.

use serde::{Deserialize, Serialize};

/// Response of `POST /api/upload-excel`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadReport {
    #[serde(default)]
    pub message: Option<String>,
    /// Number of rows imported.
    pub count: usize,
    /// First few row-level problems reported by the backend.
    #[serde(default)]
    pub errors: Vec<String>,
}

impl UploadReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
