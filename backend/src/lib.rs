//! # Order Cleaner - targeted clearing of shop columns in order workbooks
//!
//! Incoming order files are non-changeable; this tool only produces a
//! modified copy for ERP upload, based on a client removal list.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐     ┌──────────────┐
//! │ Order (xlsx) │────▶│    Sheet    │────▶│   Cleaner   │────▶│ Copy (xlsx)  │
//! │   (bytes)    │     │  (calamine) │     │ (rules+sets)│     │  + summary   │
//! └──────────────┘     └─────────────┘     └─────────────┘     └──────────────┘
//!                             ▲
//!                      ┌──────┴───────┐
//!                      │   Template   │  clients_to_clear: shop codes + nicknames
//!                      └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ordercleaner::{clean_order_bytes, load_template_from_file, CleanOptions};
//!
//! let spec = load_template_from_file("config/client_removal_template.xlsx".as_ref())?;
//! let (bytes, summary) = clean_order_bytes(&order_bytes, &spec, &CleanOptions::default())?;
//! println!("cleared {} columns", summary.columns_to_clear_count);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - hierarchical error types
//! - [`models`] - domain models (Cell, Grid, RemovalSpec, CleanSummary)
//! - [`sheet`] - workbook reading/writing
//! - [`template`] - removal-template loading
//! - [`transform`] - the cleaning rules and pipeline
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Workbook I/O
pub mod sheet;

// Removal template
pub mod template;

// Transformation
pub mod transform;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConfigError, PipelineError, SheetError, TransformError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Cell, CleanSummary, Grid, RemovalSpec};

// =============================================================================
// Re-exports - Workbook I/O
// =============================================================================

pub use sheet::{
    read_first_sheet, read_sheet_columns_from_bytes, read_sheet_columns_from_path, sheet_names,
    write_grid, SheetTable,
};

// =============================================================================
// Re-exports - Template
// =============================================================================

pub use template::{
    default_template_path, load_template_from_bytes, load_template_from_file, starter_template,
    DEFAULT_TEMPLATE_PATH, NICKNAME_COLUMN, NOTES_COLUMN, SHOP_CODE_COLUMN, TEMPLATE_SHEET,
};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::cleaner::{
    clean_grid, find_supplier_column, shop_code_columns, west_columns, CleanOptions, Cleaned,
    DATA_START_ROW, DEFAULT_PROTECTED_SUPPLIER, DEFAULT_SUPPLIER_LABEL, DEFAULT_WEST_PREFIX,
};

pub use transform::pipeline::{clean_order_bytes, clean_order_file};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{DOWNLOAD_FILENAME, XLSX_MIME};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
