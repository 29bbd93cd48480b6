//! Form definitions backing the data-entry and account screens.

use thiserror::Error;
use validator::ValidationErrors;

pub mod auth;
pub mod lansia;
pub mod upload;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("Data tidak valid: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Nama lengkap wajib diisi")]
    InvalidName,

    #[error("NIK harus terdiri dari 16 digit")]
    InvalidNik,

    #[error("Tanggal pada kolom {0} harus berformat YYYY-MM-DD")]
    InvalidDate(&'static str),

    #[error("Nilai ADL untuk {0} harus 0, 1 atau 2")]
    InvalidAdlScore(String),

    #[error("Terdapat data yang kosong: {0}")]
    MissingField(&'static str),

    #[error("Kolom tidak dikenal: {0}")]
    UnknownField(String),

    #[error("Kata sandi tidak sama")]
    PasswordMismatch,

    #[error("Pilih file Excel terlebih dahulu")]
    MissingFile,

    #[error("Format file tidak valid, gunakan file Excel (.xlsx, .xls atau .xlsm): {0}")]
    InvalidFileType(String),
}
