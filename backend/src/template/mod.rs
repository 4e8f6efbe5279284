//! Client removal template loading.
//!
//! The template is a small workbook with one sheet, `clients_to_clear`:
//!
//! - `shop_code` (required) - numeric or text shop identifiers
//! - `shop_nickname_optional` (optional) - shop nicknames
//! - `notes_optional` (ignored) - free-text comments
//!
//! Both entry points normalize identically, so a [`RemovalSpec`] is
//! indistinguishable regardless of whether it came from the bundled file
//! or an uploaded override.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::models::RemovalSpec;
use crate::sheet::{read_sheet_columns_from_bytes, read_sheet_columns_from_path, SheetTable};

/// Sheet the removal list lives on.
pub const TEMPLATE_SHEET: &str = "clients_to_clear";

/// Required identifier column.
pub const SHOP_CODE_COLUMN: &str = "shop_code";

/// Optional nickname column.
pub const NICKNAME_COLUMN: &str = "shop_nickname_optional";

/// Free-text column ignored by the logic, kept for comments.
pub const NOTES_COLUMN: &str = "notes_optional";

/// Well-known relative path of the bundled template.
pub const DEFAULT_TEMPLATE_PATH: &str = "config/client_removal_template.xlsx";

/// Environment variable overriding the bundled template path.
pub const TEMPLATE_PATH_ENV: &str = "ORDERCLEANER_TEMPLATE";

/// Resolve the template path: `ORDERCLEANER_TEMPLATE` if set, else the
/// bundled default.
pub fn default_template_path() -> std::path::PathBuf {
    std::env::var(TEMPLATE_PATH_ENV)
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from(DEFAULT_TEMPLATE_PATH))
}

/// Strip a trailing `.0` left over from numeric-to-text coercion, then trim.
fn normalize_code(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_suffix(".0").unwrap_or(trimmed).trim().to_string()
}

/// Build a [`RemovalSpec`] from an already-read template table.
///
/// Shared by both source adapters so the normalization rules cannot diverge.
fn spec_from_table(table: &SheetTable) -> ConfigResult<RemovalSpec> {
    let codes = table
        .get(SHOP_CODE_COLUMN)
        .ok_or_else(|| ConfigError::MissingColumn(SHOP_CODE_COLUMN.to_string()))?;

    let shop_codes: HashSet<String> = codes
        .iter()
        .map(|c| normalize_code(c))
        .filter(|c| !c.is_empty())
        .collect();

    // Absent nickname column means an empty set, not an error.
    let nicknames: HashSet<String> = table
        .get(NICKNAME_COLUMN)
        .map(|values| {
            values
                .iter()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Ok(RemovalSpec::new(shop_codes, nicknames))
}

/// Load the removal template from a file on disk.
pub fn load_template_from_file(path: &Path) -> ConfigResult<RemovalSpec> {
    if !path.exists() {
        return Err(ConfigError::TemplateNotFound(path.to_path_buf()));
    }
    let table = read_sheet_columns_from_path(path, TEMPLATE_SHEET)?;
    spec_from_table(&table)
}

/// Load the removal template from an uploaded workbook held in memory.
pub fn load_template_from_bytes(bytes: &[u8]) -> ConfigResult<RemovalSpec> {
    let table = read_sheet_columns_from_bytes(bytes, TEMPLATE_SHEET)?;
    spec_from_table(&table)
}

/// Build a starter template workbook with the expected columns and one
/// example row. Used by `ordercleaner template init` to (re)create the
/// bundled file.
pub fn starter_template() -> ConfigResult<Vec<u8>> {
    use crate::models::Grid;
    use crate::sheet::write_grid;

    let grid = Grid::from_rows(vec![
        vec![
            SHOP_CODE_COLUMN.into(),
            NICKNAME_COLUMN.into(),
            NOTES_COLUMN.into(),
        ],
        vec![
            "003".into(),
            "ვანთა".into(),
            "example row, replace with your own".into(),
        ],
    ]);

    Ok(write_grid(TEMPLATE_SHEET, &grid)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, Grid};
    use crate::sheet::write_grid;

    fn template_bytes(rows: &[Vec<Cell>]) -> Vec<u8> {
        write_grid(TEMPLATE_SHEET, &Grid::from_rows(rows.to_vec())).unwrap()
    }

    #[test]
    fn test_load_template_both_columns() {
        let bytes = template_bytes(&[
            vec!["shop_code".into(), "shop_nickname_optional".into(), "notes_optional".into()],
            vec!["003".into(), "ვანთა".into(), "first batch".into()],
            vec![Cell::Number(465.0), Cell::Empty, Cell::Empty],
            vec!["  037  ".into(), "  ვაკე ".into(), Cell::Empty],
        ]);

        let spec = load_template_from_bytes(&bytes).unwrap();
        assert_eq!(spec.shop_codes.len(), 3);
        assert!(spec.shop_codes.contains("003"));
        assert!(spec.shop_codes.contains("465"));
        assert!(spec.shop_codes.contains("037"));
        assert_eq!(spec.nicknames.len(), 2);
        assert!(spec.nicknames.contains("ვანთა"));
        assert!(spec.nicknames.contains("ვაკე"));
    }

    #[test]
    fn test_trailing_dot_zero_stripped() {
        let bytes = template_bytes(&[
            vec!["shop_code".into()],
            vec!["099.0".into()],
        ]);

        let spec = load_template_from_bytes(&bytes).unwrap();
        assert!(spec.shop_codes.contains("099"));
        assert!(!spec.shop_codes.contains("099.0"));
    }

    #[test]
    fn test_missing_nickname_column_is_not_an_error() {
        let bytes = template_bytes(&[
            vec!["shop_code".into()],
            vec!["003".into()],
        ]);

        let spec = load_template_from_bytes(&bytes).unwrap();
        assert!(spec.nicknames.is_empty());
        assert!(!spec.is_empty());
    }

    #[test]
    fn test_missing_shop_code_column_fails() {
        let bytes = template_bytes(&[
            vec!["shop_nickname_optional".into()],
            vec!["ვანთა".into()],
        ]);

        let err = load_template_from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, ConfigError::MissingColumn(ref c) if c == "shop_code"));
    }

    #[test]
    fn test_empty_values_excluded() {
        let bytes = template_bytes(&[
            vec!["shop_code".into(), "shop_nickname_optional".into()],
            vec!["   ".into(), "  ".into()],
            vec![Cell::Empty, Cell::Empty],
        ]);

        let spec = load_template_from_bytes(&bytes).unwrap();
        assert!(spec.is_empty());
    }

    #[test]
    fn test_file_and_bytes_sources_agree() {
        let bytes = template_bytes(&[
            vec!["shop_code".into(), "shop_nickname_optional".into()],
            vec![Cell::Number(3.0), "ვანთა".into()],
        ]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client_removal_template.xlsx");
        std::fs::write(&path, &bytes).unwrap();

        let from_file = load_template_from_file(&path).unwrap();
        let from_bytes = load_template_from_bytes(&bytes).unwrap();
        assert_eq!(from_file, from_bytes);
        assert!(from_file.shop_codes.contains("3"));
    }

    #[test]
    fn test_starter_template_loads() {
        let bytes = starter_template().unwrap();
        let spec = load_template_from_bytes(&bytes).unwrap();
        assert!(spec.shop_codes.contains("003"));
        assert!(spec.nicknames.contains("ვანთა"));
    }

    #[test]
    fn test_template_not_found() {
        let err = load_template_from_file(Path::new("does/not/exist.xlsx")).unwrap_err();
        assert!(matches!(err, ConfigError::TemplateNotFound(_)));
    }
}
