//! Bytes-in/bytes-out orchestration of a cleaning run.
//!
//! parse -> clean -> serialize. Output bytes exist only once the whole
//! pipeline has succeeded; a failing step never yields a partial workbook.
//!
//! # Example
//!
//! ```rust,ignore
//! use ordercleaner::{clean_order_bytes, CleanOptions, RemovalSpec};
//!
//! let spec: RemovalSpec = load_template_from_file(path)?;
//! let (bytes, summary) = clean_order_bytes(&order_bytes, &spec, &CleanOptions::default())?;
//! println!("cleared {} columns", summary.columns_to_clear_count);
//! ```

use std::path::Path;

use crate::error::PipelineResult;
use crate::models::{CleanSummary, RemovalSpec};
use crate::sheet::{read_first_sheet, write_grid};
use crate::transform::cleaner::{clean_grid, CleanOptions};

/// Clean an order workbook held in memory.
///
/// Returns the transformed workbook bytes and a summary of the run. The
/// input bytes are never altered. An empty [`RemovalSpec`] succeeds as a
/// no-op apart from West-column removal; callers that want to warn instead
/// should check [`RemovalSpec::is_empty`] before invoking this.
pub fn clean_order_bytes(
    order_bytes: &[u8],
    spec: &RemovalSpec,
    options: &CleanOptions,
) -> PipelineResult<(Vec<u8>, CleanSummary)> {
    let (sheet_name, grid) = read_first_sheet(order_bytes)?;

    let cleaned = clean_grid(&grid, spec, options)?;

    let bytes = write_grid(&sheet_name, &cleaned.grid)?;

    let summary = CleanSummary {
        sheet_name,
        columns_to_clear_count: cleaned.columns_to_clear_count,
        west_columns_dropped: cleaned.west_columns_dropped,
        rows_eligible_by_supplier_rule: cleaned.eligible_rows,
        cleared_cells_estimate: cleaned.cleared_cells_estimate,
        protected_supplier: options.protected_supplier.clone(),
    };

    Ok((bytes, summary))
}

/// Clean an order workbook read from disk.
///
/// Same as [`clean_order_bytes`] with the read folded in.
pub fn clean_order_file(
    path: &Path,
    spec: &RemovalSpec,
    options: &CleanOptions,
) -> PipelineResult<(Vec<u8>, CleanSummary)> {
    let bytes = std::fs::read(path).map_err(crate::error::SheetError::Io)?;
    clean_order_bytes(&bytes, spec, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, Grid};
    use crate::sheet::read_first_sheet;
    use crate::transform::cleaner::{DEFAULT_PROTECTED_SUPPLIER, DEFAULT_SUPPLIER_LABEL};
    use std::collections::HashSet;

    fn order_bytes() -> Vec<u8> {
        let grid = Grid::from_rows(vec![
            vec![
                DEFAULT_SUPPLIER_LABEL.into(),
                "მაღაზია".into(),
                "ვანთა".into(),
                "დასავლეთი სულ".into(),
            ],
            vec!["".into(), "#003# ქ.თბილისი".into(), "".into(), "".into()],
            vec!["".into(), "შესაკვეთი რაოდენობა".into(), "".into(), "".into()],
            vec!["other".into(), Cell::Number(10.0), Cell::Number(20.0), Cell::Number(30.0)],
            vec![
                DEFAULT_PROTECTED_SUPPLIER.into(),
                Cell::Number(11.0),
                Cell::Number(21.0),
                Cell::Number(31.0),
            ],
        ]);
        write_grid("TDSheet", &grid).unwrap()
    }

    fn removal(codes: &[&str], nicknames: &[&str]) -> RemovalSpec {
        RemovalSpec::new(
            codes.iter().map(|s| s.to_string()).collect::<HashSet<_>>(),
            nicknames.iter().map(|s| s.to_string()).collect::<HashSet<_>>(),
        )
    }

    #[test]
    fn test_end_to_end_clean() {
        let input = order_bytes();
        let (output, summary) = clean_order_bytes(
            &input,
            &removal(&["003"], &["ვანთა"]),
            &CleanOptions::default(),
        )
        .unwrap();

        assert_eq!(summary.sheet_name, "TDSheet");
        assert_eq!(summary.columns_to_clear_count, 2);
        assert_eq!(summary.west_columns_dropped, 1);
        assert_eq!(summary.rows_eligible_by_supplier_rule, 1);
        assert_eq!(summary.cleared_cells_estimate, 2);
        assert_eq!(summary.protected_supplier, DEFAULT_PROTECTED_SUPPLIER);

        // Input bytes untouched, output is a fresh buffer.
        assert_eq!(input, order_bytes());

        let (name, grid) = read_first_sheet(&output).unwrap();
        assert_eq!(name, "TDSheet");
        assert_eq!(grid.width(), 3);
        // Eligible row blanked, protected row intact, headers preserved.
        assert_eq!(grid.cell(3, 1).as_text(), "");
        assert_eq!(grid.cell(3, 2).as_text(), "");
        assert_eq!(grid.cell(4, 1), &Cell::Number(11.0));
        assert_eq!(grid.cell(0, 2).as_text(), "ვანთა");
    }

    #[test]
    fn test_no_output_on_structure_error() {
        // Order without the supplier column: the pipeline fails before
        // producing any bytes.
        let grid = Grid::from_rows(vec![vec!["ნომენკლატურა".into()]]);
        let input = write_grid("TDSheet", &grid).unwrap();

        let result = clean_order_bytes(&input, &removal(&["003"], &[]), &CleanOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_clean_order_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("order.xlsx");
        std::fs::write(&path, order_bytes()).unwrap();

        let (_, summary) = clean_order_file(
            &path,
            &removal(&["003"], &[]),
            &CleanOptions::default(),
        )
        .unwrap();
        assert_eq!(summary.columns_to_clear_count, 1);
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let result = clean_order_bytes(b"not a workbook", &removal(&["003"], &[]), &CleanOptions::default());
        assert!(result.is_err());
    }
}
