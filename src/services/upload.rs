use std::path::{Path, PathBuf};

use crate::domain::upload::UploadReport;
use crate::forms::upload::UploadSpreadsheetForm;
use crate::repository::SpreadsheetTransfer;
use crate::services::{ServiceError, ServiceResult};

/// File name offered for the downloaded input template.
pub const DEFAULT_TEMPLATE_NAME: &str = "template_input_lansia.xlsx";

/// Notice shown after a successful import.
pub fn upload_success_message(report: &UploadReport) -> String {
    format!("Berhasil mengupload {} data lansia", report.count)
}

/// Reads the chosen spreadsheet from disk and sends it to the import endpoint.
pub async fn upload_spreadsheet<R>(
    repo: &R,
    form: &UploadSpreadsheetForm,
) -> ServiceResult<UploadReport>
where
    R: SpreadsheetTransfer + ?Sized,
{
    let path = form.validated_path().map_err(|err| {
        log::error!("Failed to validate upload form: {err}");
        err
    })?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ServiceError::Form(format!("Nama file tidak valid: {}", path.display())))?
        .to_string();

    let bytes = tokio::fs::read(path).await.map_err(|err| {
        log::error!("Failed to read {}: {err}", path.display());
        ServiceError::from(err)
    })?;

    let report = repo
        .upload_spreadsheet(&file_name, bytes)
        .await
        .map_err(|err| {
            log::error!("Failed to upload {file_name}: {err}");
            ServiceError::from(err)
        })?;

    if report.has_errors() {
        log::warn!(
            "Import of {file_name} reported {} row errors",
            report.errors.len()
        );
    }

    Ok(report)
}

/// Resolves where the template is written: an explicit file, a directory that
/// receives the default name, or the default name inside `template_dir`.
pub fn template_destination(target: Option<&Path>, template_dir: &Path) -> PathBuf {
    match target {
        Some(path) if path.is_dir() => path.join(DEFAULT_TEMPLATE_NAME),
        Some(path) => path.to_path_buf(),
        None => template_dir.join(DEFAULT_TEMPLATE_NAME),
    }
}

/// Downloads the input template and writes it to disk, returning the path
/// written.
pub async fn download_template<R>(
    repo: &R,
    target: Option<&Path>,
    template_dir: &Path,
) -> ServiceResult<PathBuf>
where
    R: SpreadsheetTransfer + ?Sized,
{
    let bytes = repo.export_template().await.map_err(|err| {
        log::error!("Failed to export template: {err}");
        ServiceError::from(err)
    })?;

    let destination = template_destination(target, template_dir);
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&destination, &bytes).await.map_err(|err| {
        log::error!("Failed to write {}: {err}", destination.display());
        ServiceError::from(err)
    })?;

    log::info!("Template saved to {}", destination.display());
    Ok(destination)
}
