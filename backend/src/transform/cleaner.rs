//! Core cleaning rules for an order grid.
//!
//! Order sheet layout (TDSheet):
//!
//! - row 0: nicknames and master fields ("ძირითადი მომწოდებელი",
//!   "ნომენკლატურა", aggregates, shop nicknames)
//! - row 1: addresses carrying `#ID#` shop-code tokens
//! - row 2: labels ("შესაკვეთი რაოდენობა")
//! - rows 3..: data
//!
//! Rules, in order:
//!
//! 1. locate the supplier column (fatal if absent)
//! 2. map columns to shop codes via the first `#digits#` token in row 1
//! 3. clear-set = columns matched by shop code OR by nickname
//! 4. West aggregate columns = trimmed row-0 label starts with the prefix
//! 5. blank clear-set cells in every non-protected data row
//! 6. drop West columns entirely; a clear-set column that is also West is
//!    dropped without being cleared first

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::{TransformError, TransformResult};
use crate::models::{Cell, Grid, RemovalSpec};

/// Row-0 label of the supplier column.
pub const DEFAULT_SUPPLIER_LABEL: &str = "ძირითადი მომწოდებელი";

/// Supplier whose rows are never altered.
pub const DEFAULT_PROTECTED_SUPPLIER: &str = "გაგრა პლუსი";

/// Row-0 prefix of the aggregate columns that are always removed.
pub const DEFAULT_WEST_PREFIX: &str = "დასავლეთი";

/// First data row; rows above are nickname/address/label headers.
pub const DATA_START_ROW: usize = 3;

/// Delimited shop-code token in the address row, e.g. `#003#`.
static SHOP_CODE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#(\d+)#").expect("static pattern"));

/// Parameters of a cleaning run.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanOptions {
    /// Exact row-0 label identifying the supplier column.
    pub supplier_label: String,

    /// Rows whose supplier cell equals this value (after trim) are protected.
    pub protected_supplier: String,

    /// Row-0 prefix marking "West" aggregate columns.
    pub west_prefix: String,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            supplier_label: DEFAULT_SUPPLIER_LABEL.to_string(),
            protected_supplier: DEFAULT_PROTECTED_SUPPLIER.to_string(),
            west_prefix: DEFAULT_WEST_PREFIX.to_string(),
        }
    }
}

/// Result of [`clean_grid`]: the new grid plus the run's bookkeeping.
#[derive(Debug, Clone)]
pub struct Cleaned {
    /// The transformed grid, West columns already removed.
    pub grid: Grid,

    /// Size of the clear-set (before West removal).
    pub columns_to_clear_count: usize,

    /// West columns dropped.
    pub west_columns_dropped: usize,

    /// Data rows not protected by the supplier rule.
    pub eligible_rows: usize,

    /// Cells blanked whose prior value was non-null. Cells in clear-set
    /// columns that were also West are dropped, not cleared, and do not
    /// count here.
    pub cleared_cells_estimate: usize,
}

/// Leftmost column whose trimmed row-0 value equals `label` exactly.
pub fn find_supplier_column(grid: &Grid, label: &str) -> Option<usize> {
    (0..grid.width()).find(|&col| grid.cell(0, col).trimmed() == label)
}

/// Column -> shop code, from the first `#digits#` token in the address row.
///
/// Columns without a token are simply absent; a cell with several tokens
/// contributes only the first.
pub fn shop_code_columns(grid: &Grid) -> HashMap<usize, String> {
    let mut map = HashMap::new();
    for col in 0..grid.width() {
        let meta = grid.cell(1, col).as_text();
        if let Some(caps) = SHOP_CODE_TOKEN.captures(&meta) {
            map.insert(col, caps[1].to_string());
        }
    }
    map
}

/// Columns whose trimmed row-0 label starts with `prefix`.
pub fn west_columns(grid: &Grid, prefix: &str) -> Vec<usize> {
    (0..grid.width())
        .filter(|&col| grid.cell(0, col).trimmed().starts_with(prefix))
        .collect()
}

/// Apply the cleaning rules to an order grid.
///
/// The input grid is untouched; a transformed copy is returned. Fails only
/// when the supplier column cannot be found, since the protection rule
/// cannot be evaluated without it.
pub fn clean_grid(
    grid: &Grid,
    spec: &RemovalSpec,
    options: &CleanOptions,
) -> TransformResult<Cleaned> {
    let width = grid.width();

    let supplier_col = find_supplier_column(grid, &options.supplier_label).ok_or_else(|| {
        TransformError::SupplierColumnNotFound(options.supplier_label.clone())
    })?;

    // Clear-set: union of shop-code matches and nickname matches. A column
    // matching by both keys lands in the set once.
    let mut columns_to_clear: BTreeSet<usize> = BTreeSet::new();
    for (col, code) in shop_code_columns(grid) {
        if spec.shop_codes.contains(&code) {
            columns_to_clear.insert(col);
        }
    }
    for col in 0..width {
        if spec.nicknames.contains(grid.cell(0, col).trimmed().as_str()) {
            columns_to_clear.insert(col);
        }
    }

    // West detection is independent of the clear-set.
    let west = west_columns(grid, &options.west_prefix);
    let west_set: HashSet<usize> = west.iter().copied().collect();

    // A row is protected when its supplier cell, trimmed, equals the
    // protected supplier exactly. Header rows are never eligible.
    let eligible: Vec<usize> = (DATA_START_ROW..grid.height())
        .filter(|&row| grid.cell(row, supplier_col).trimmed() != options.protected_supplier)
        .collect();

    let mut out = grid.clone();
    let mut cleared_cells = 0;

    for &col in &columns_to_clear {
        if west_set.contains(&col) {
            // West removal takes precedence; the column disappears entirely.
            continue;
        }
        for &row in &eligible {
            if !out.cell(row, col).is_null() {
                cleared_cells += 1;
            }
            out.set(row, col, Cell::Text(String::new()));
        }
    }

    out.drop_columns(&west);

    Ok(Cleaned {
        grid: out,
        columns_to_clear_count: columns_to_clear.len(),
        west_columns_dropped: west.len(),
        eligible_rows: eligible.len(),
        cleared_cells_estimate: cleared_cells,
    })
}
