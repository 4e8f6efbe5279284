//! Domain models for the order cleaning pipeline.
//!
//! This module contains the core data structures used throughout the pipeline:
//!
//! - [`Cell`] - an untyped spreadsheet cell value
//! - [`Grid`] - a 2D grid of cells, headers included as ordinary rows
//! - [`RemovalSpec`] - the two lookup sets built from the removal template
//! - [`CleanSummary`] - what a cleaning run changed

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// =============================================================================
// Cells
// =============================================================================

/// An untyped cell value.
///
/// Matching logic only ever needs the text-coerced, trimmed form, so the
/// coercion lives here once: [`Cell::as_text`] / [`Cell::trimmed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl Cell {
    /// Coerce the cell to text.
    ///
    /// Integral numbers render without a decimal point (`3.0` becomes `"3"`),
    /// matching how upstream tools display numeric cells. `Empty` becomes `""`.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            Cell::Bool(b) => b.to_string(),
            Cell::Empty => String::new(),
        }
    }

    /// Text coercion with surrounding whitespace stripped.
    pub fn trimmed(&self) -> String {
        self.as_text().trim().to_string()
    }

    /// Whether the cell carries no value at all.
    ///
    /// An explicit empty string is NOT null: a cleared cell holds `Text("")`.
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Empty
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

// =============================================================================
// Grid
// =============================================================================

/// A 2D grid of cells.
///
/// Rows 0-2 of an order grid are the nickname/address/label header rows; data
/// rows start at index 3. Rows may be ragged; reads past the end of a row
/// yield [`Cell::Empty`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

/// Shared empty cell for out-of-range reads.
const EMPTY: Cell = Cell::Empty;

impl Grid {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell at (row, col); `Empty` when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows.get(row).and_then(|r| r.get(col)).unwrap_or(&EMPTY)
    }

    /// Overwrite a cell, extending the row with `Empty` if needed.
    pub fn set(&mut self, row: usize, col: usize, value: Cell) {
        if row >= self.rows.len() {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let r = &mut self.rows[row];
        if col >= r.len() {
            r.resize(col + 1, Cell::Empty);
        }
        r[col] = value;
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Drop entire columns, shifting the ones to their right.
    ///
    /// Applies to every row, header rows included. Indices refer to the grid
    /// before removal; duplicates are ignored.
    pub fn drop_columns(&mut self, columns: &[usize]) {
        if columns.is_empty() {
            return;
        }
        let mut sorted: Vec<usize> = columns.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        for row in &mut self.rows {
            // Remove right-to-left so earlier indices stay valid.
            for &col in sorted.iter().rev() {
                if col < row.len() {
                    row.remove(col);
                }
            }
        }
    }
}

// =============================================================================
// Removal Spec
// =============================================================================

/// The two lookup sets built from the client removal template.
///
/// Either set may be empty; both empty means there is nothing to clear and
/// shells should warn and skip the transform (the transform itself would
/// simply be a no-op apart from West-column removal).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemovalSpec {
    /// Normalized shop codes (trimmed, trailing `.0` stripped).
    pub shop_codes: HashSet<String>,

    /// Trimmed shop nicknames.
    pub nicknames: HashSet<String>,
}

impl RemovalSpec {
    pub fn new(shop_codes: HashSet<String>, nicknames: HashSet<String>) -> Self {
        Self { shop_codes, nicknames }
    }

    /// True when there is nothing to clear.
    pub fn is_empty(&self) -> bool {
        self.shop_codes.is_empty() && self.nicknames.is_empty()
    }
}

// =============================================================================
// Summary
// =============================================================================

/// What a cleaning run changed.
///
/// `cleared_cells_estimate` counts eligible-row cells whose prior value was
/// non-null, so it undercounts cells that were already empty. This is the
/// documented approximation, not an exact changed-cell count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanSummary {
    /// Name of the (single) sheet that was processed.
    pub sheet_name: String,

    /// Size of the clear-set: columns matched by shop code or nickname.
    pub columns_to_clear_count: usize,

    /// Aggregate "West" columns removed entirely.
    pub west_columns_dropped: usize,

    /// Data rows not protected by the supplier rule.
    pub rows_eligible_by_supplier_rule: usize,

    /// Approximate count of cells blanked.
    pub cleared_cells_estimate: usize,

    /// The protected-supplier value the run used.
    pub protected_supplier: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_cell_text_coercion() {
        assert_eq!(Cell::Text("ვანთა".into()).as_text(), "ვანთა");
        assert_eq!(Cell::Number(3.0).as_text(), "3");
        assert_eq!(Cell::Number(465.0).as_text(), "465");
        assert_eq!(Cell::Number(1.5).as_text(), "1.5");
        assert_eq!(Cell::Bool(true).as_text(), "true");
        assert_eq!(Cell::Empty.as_text(), "");
    }

    #[test]
    fn test_cell_trimmed() {
        assert_eq!(Cell::Text("  დასავლეთი ".into()).trimmed(), "დასავლეთი");
    }

    #[test]
    fn test_empty_string_is_not_null() {
        assert!(Cell::Empty.is_null());
        assert!(!Cell::Text(String::new()).is_null());
        assert!(!Cell::Number(0.0).is_null());
    }

    #[test]
    fn test_grid_out_of_range_reads_are_empty() {
        let grid = Grid::from_rows(vec![vec![Cell::from("a")]]);
        assert_eq!(grid.cell(0, 0), &Cell::from("a"));
        assert_eq!(grid.cell(0, 5), &Cell::Empty);
        assert_eq!(grid.cell(9, 0), &Cell::Empty);
    }

    #[test]
    fn test_grid_set_extends_ragged_row() {
        let mut grid = Grid::new();
        grid.push_row(vec![Cell::from("a")]);
        grid.set(0, 2, Cell::from("c"));
        assert_eq!(grid.cell(0, 1), &Cell::Empty);
        assert_eq!(grid.cell(0, 2), &Cell::from("c"));
    }

    #[test]
    fn test_drop_columns_shifts_and_dedups() {
        let mut grid = Grid::from_rows(vec![
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            vec!["1".into(), "2".into(), "3".into(), "4".into()],
        ]);
        grid.drop_columns(&[1, 3, 1]);
        assert_eq!(
            grid.rows(),
            &[
                vec![Cell::from("a"), Cell::from("c")],
                vec![Cell::from("1"), Cell::from("3")],
            ]
        );
    }

    #[test]
    fn test_drop_columns_on_ragged_rows() {
        let mut grid = Grid::from_rows(vec![
            vec!["a".into(), "b".into(), "c".into()],
            vec!["1".into()],
        ]);
        grid.drop_columns(&[2]);
        assert_eq!(grid.rows()[0].len(), 2);
        assert_eq!(grid.rows()[1].len(), 1);
    }

    #[test]
    fn test_removal_spec_is_empty() {
        assert!(RemovalSpec::default().is_empty());

        let mut codes = HashSet::new();
        codes.insert("003".to_string());
        assert!(!RemovalSpec::new(codes, HashSet::new()).is_empty());
    }
}
