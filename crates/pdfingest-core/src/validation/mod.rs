//! Input validation
//!
//! Pure checks run before any side effect: tenant-name shape and uploaded-file
//! constraints. Both error enums render the exact client-facing messages and convert
//! into `AppError::InvalidInput` with a prefix naming the offending input.

use crate::error::AppError;

pub const TENANT_NAME_MIN_LEN: usize = 3;
pub const TENANT_NAME_MAX_LEN: usize = 50;

/// Suffix every upload's file name must end with, compared case-insensitively.
pub const PDF_SUFFIX: &str = ".pdf";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TenantNameError {
    #[error("tenant name is required")]
    Empty,

    #[error("tenant name must be at least 3 characters")]
    TooShort,

    #[error("tenant name must be less than 50 characters")]
    TooLong,

    #[error("tenant name can only contain letters, numbers, and underscores")]
    InvalidCharacter(char),
}

impl From<TenantNameError> for AppError {
    fn from(err: TenantNameError) -> Self {
        AppError::InvalidInput(format!("Invalid tenant name: {}", err))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PdfValidationError {
    #[error("PDF file is required")]
    Missing,

    #[error("file must be a PDF")]
    NotPdf,

    #[error("file is empty")]
    EmptyFile,

    #[error("file size must be less than {}MB", .max / 1024 / 1024)]
    FileTooLarge { size: usize, max: usize },
}

impl From<PdfValidationError> for AppError {
    fn from(err: PdfValidationError) -> Self {
        match err {
            PdfValidationError::Missing => AppError::InvalidInput(err.to_string()),
            other => AppError::InvalidInput(format!("Invalid PDF file: {}", other)),
        }
    }
}

/// Check that `name` is 3 to 50 characters drawn from `[A-Za-z0-9_]`.
pub fn validate_tenant_name(name: &str) -> Result<(), TenantNameError> {
    if name.is_empty() {
        return Err(TenantNameError::Empty);
    }

    let len = name.chars().count();
    if len < TENANT_NAME_MIN_LEN {
        return Err(TenantNameError::TooShort);
    }
    if len > TENANT_NAME_MAX_LEN {
        return Err(TenantNameError::TooLong);
    }

    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
    {
        return Err(TenantNameError::InvalidCharacter(c));
    }

    Ok(())
}

/// Check an uploaded file's name and size.
///
/// Order matches what clients see: extension first, then the size ceiling, then
/// emptiness.
pub fn validate_pdf(file_name: &str, size: usize, max_size: usize) -> Result<(), PdfValidationError> {
    if !file_name.to_ascii_lowercase().ends_with(PDF_SUFFIX) {
        return Err(PdfValidationError::NotPdf);
    }

    if size > max_size {
        return Err(PdfValidationError::FileTooLarge {
            size,
            max: max_size,
        });
    }

    if size == 0 {
        return Err(PdfValidationError::EmptyFile);
    }

    Ok(())
}

/// Strip any client-side directory components from an uploaded file name.
pub fn sanitize_file_name(file_name: &str) -> String {
    let trimmed = file_name.trim();
    let last = trimmed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(trimmed)
        .trim();
    if last.is_empty() {
        "document.pdf".to_string()
    } else {
        last.to_string()
    }
}
