use std::path::{Path, PathBuf};

use crate::forms::FormError;

/// Spreadsheet extensions accepted by the backend import.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["xlsx", "xls", "xlsm"];

#[derive(Clone, Debug, Default)]
/// Form state of the Excel import screen.
pub struct UploadSpreadsheetForm {
    /// Chosen file, if any.
    pub path: Option<PathBuf>,
}

impl UploadSpreadsheetForm {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Returns the chosen file once it has an Excel extension.
    pub fn validated_path(&self) -> Result<&Path, FormError> {
        let path = self.path.as_deref().ok_or(FormError::MissingFile)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            Ok(path)
        } else {
            Err(FormError::InvalidFileType(path.display().to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_reported() {
        let form = UploadSpreadsheetForm::default();
        assert!(matches!(form.validated_path(), Err(FormError::MissingFile)));
    }

    #[test]
    fn only_excel_extensions_are_accepted() {
        assert!(UploadSpreadsheetForm::new("data/lansia.XLSX").validated_path().is_ok());
        assert!(UploadSpreadsheetForm::new("lansia.xlsm").validated_path().is_ok());
        assert!(matches!(
            UploadSpreadsheetForm::new("lansia.csv").validated_path(),
            Err(FormError::InvalidFileType(_))
        ));
        assert!(matches!(
            UploadSpreadsheetForm::new("lansia").validated_path(),
            Err(FormError::InvalidFileType(_))
        ));
    }
}
