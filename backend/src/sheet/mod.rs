//! Workbook reading and writing.
//!
//! This is the spreadsheet I/O collaborator the rest of the pipeline is
//! written against. Reading goes through `calamine`, writing through
//! `rust_xlsxwriter`; nothing outside this module touches either crate.
//!
//! Two read shapes are exposed:
//!
//! - [`read_first_sheet`] - first sheet by position as an untyped [`Grid`],
//!   no header inference (header rows become ordinary grid rows)
//! - [`read_sheet_columns_from_path`] / [`read_sheet_columns_from_bytes`] -
//!   a named sheet as a mapping of column name to text values, missing
//!   cells as empty strings

use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use crate::error::{SheetError, SheetResult};
use crate::models::{Cell, Grid};

/// A sheet read column-wise: column name -> text values, top to bottom.
pub type SheetTable = HashMap<String, Vec<String>>;

// =============================================================================
// Reading
// =============================================================================

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::Error(e) => Cell::Text(format!("{:?}", e)),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

fn grid_from_range(range: &Range<Data>) -> Grid {
    let mut grid = Grid::new();
    for row in range.rows() {
        grid.push_row(row.iter().map(cell_from_data).collect());
    }
    grid
}

/// List the sheet names of a workbook held in memory.
pub fn sheet_names(bytes: &[u8]) -> SheetResult<Vec<String>> {
    let workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    Ok(workbook.sheet_names().to_vec())
}

/// Read the first sheet (by position) of a workbook as an untyped grid.
///
/// Returns the sheet name together with the grid so the output workbook can
/// preserve it.
pub fn read_first_sheet(bytes: &[u8]) -> SheetResult<(String, Grid)> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SheetError::NoSheets)?;

    let range = workbook.worksheet_range(&sheet_name)?;
    Ok((sheet_name, grid_from_range(&range)))
}

fn columns_from_range(range: &Range<Data>) -> SheetTable {
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|d| cell_from_data(d).trimmed()).collect(),
        None => return SheetTable::new(),
    };

    let mut table: SheetTable = headers
        .iter()
        .filter(|h| !h.is_empty())
        .map(|h| (h.clone(), Vec::new()))
        .collect();

    for row in rows {
        for (i, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let text = row.get(i).map(|d| cell_from_data(d).as_text()).unwrap_or_default();
            if let Some(values) = table.get_mut(header) {
                values.push(text);
            }
        }
    }

    table
}

fn named_range<R>(workbook: &mut Xlsx<R>, sheet_name: &str) -> SheetResult<Range<Data>>
where
    R: std::io::Read + std::io::Seek,
{
    if !workbook.sheet_names().iter().any(|n| n == sheet_name) {
        return Err(SheetError::SheetNotFound(sheet_name.to_string()));
    }
    Ok(workbook.worksheet_range(sheet_name)?)
}

/// Read a named sheet from a file as a column table, all values text-coerced.
pub fn read_sheet_columns_from_path(path: &Path, sheet_name: &str) -> SheetResult<SheetTable> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = named_range(&mut workbook, sheet_name)?;
    Ok(columns_from_range(&range))
}

/// Read a named sheet from an in-memory workbook as a column table.
///
/// Semantically identical to [`read_sheet_columns_from_path`]; only the
/// source differs.
pub fn read_sheet_columns_from_bytes(bytes: &[u8], sheet_name: &str) -> SheetResult<SheetTable> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let range = named_range(&mut workbook, sheet_name)?;
    Ok(columns_from_range(&range))
}

// =============================================================================
// Writing
// =============================================================================

/// Serialize a grid to a workbook buffer as a single named sheet.
///
/// No separate header row is emitted: the grid already contains all rows,
/// headers included. Explicit empty-string cells are written as such;
/// [`Cell::Empty`] cells are left unwritten.
pub fn write_grid(sheet_name: &str, grid: &Grid) -> SheetResult<Vec<u8>> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (row_idx, row) in grid.rows().iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let row = row_idx as u32;
            let col = col_idx as u16;
            match cell {
                Cell::Text(s) => {
                    worksheet.write_string(row, col, s)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(row, col, *n)?;
                }
                Cell::Bool(b) => {
                    worksheet.write_boolean(row, col, *b)?;
                }
                Cell::Empty => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
