//! Error types for the order cleaning pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`SheetError`] - workbook reading/writing errors
//! - [`ConfigError`] - removal-template loading errors
//! - [`TransformError`] - order structure errors
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries. The core never
//! logs or retries; recovery decisions belong to the calling shell.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Workbook I/O Errors
// =============================================================================

/// Errors while reading or writing a workbook.
#[derive(Debug, Error)]
pub enum SheetError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the workbook.
    #[error("Failed to read workbook: {0}")]
    Read(#[from] calamine::XlsxError),

    /// Failed to serialize the workbook.
    #[error("Failed to write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    /// Workbook contains no sheets.
    #[error("Workbook contains no sheets")]
    NoSheets,

    /// A named sheet is missing.
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),
}

// =============================================================================
// Removal-Template Errors
// =============================================================================

/// Errors while loading the client removal template.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Template file absent at the expected path.
    #[error("Template not found at {0}")]
    TemplateNotFound(PathBuf),

    /// Required column missing from the template sheet.
    #[error("Template must contain a column named '{0}'")]
    MissingColumn(String),

    /// Workbook-level failure while reading the template.
    #[error("Template sheet error: {0}")]
    Sheet(#[from] SheetError),
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Errors during the order transformation itself.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The supplier column could not be located in the nickname row.
    /// Fatal: the protection rule cannot be evaluated without it.
    #[error("Could not find supplier column '{0}' in the first row")]
    SupplierColumnNotFound(String),

    /// Workbook-level failure while parsing the order.
    #[error("Order sheet error: {0}")]
    Sheet(#[from] SheetError),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by
/// [`crate::transform::pipeline::clean_order_bytes`]. It wraps all
/// lower-level errors; no partial output is ever produced on failure.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Template loading error.
    #[error("Template error: {0}")]
    Config(#[from] ConfigError),

    /// Transformation error.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Workbook I/O error.
    #[error("Workbook error: {0}")]
    Sheet(#[from] SheetError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for workbook I/O operations.
pub type SheetResult<T> = Result<T, SheetError>;

/// Result type for template operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for transformation operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // TransformError -> PipelineError
        let transform_err = TransformError::SupplierColumnNotFound("supplier".into());
        let pipeline_err: PipelineError = transform_err.into();
        assert!(pipeline_err.to_string().contains("supplier"));

        // ConfigError -> PipelineError
        let config_err = ConfigError::MissingColumn("shop_code".into());
        let pipeline_err: PipelineError = config_err.into();
        assert!(pipeline_err.to_string().contains("shop_code"));
    }

    #[test]
    fn test_sheet_error_nested_in_config() {
        let sheet_err = SheetError::SheetNotFound("clients_to_clear".into());
        let config_err: ConfigError = sheet_err.into();
        assert!(config_err.to_string().contains("clients_to_clear"));
    }

    #[test]
    fn test_template_not_found_shows_path() {
        let err = ConfigError::TemplateNotFound(PathBuf::from("config/client_removal_template.xlsx"));
        assert!(err.to_string().contains("client_removal_template.xlsx"));
    }
}
