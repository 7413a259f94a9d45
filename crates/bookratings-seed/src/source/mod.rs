//! Tabular seed sources: CSV/TSV through `csv`, spreadsheets through `calamine`.
//!
//! The first non-empty row is a header and is skipped. Rows whose cells are
//! all blank are dropped. Every returned row carries its 1-based line number
//! in the source.

mod rows;

pub use rows::{RawBookRow, RawRatingRow};

use std::fs::File;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::{Result, SeedError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Delimited(u8),
    Workbook,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(Self::Delimited(b',')),
            "tsv" => Ok(Self::Delimited(b'\t')),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Workbook),
            _ => Err(SeedError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// One data row of a tabular source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub line: usize,
    pub cells: Vec<String>,
}

impl SourceRow {
    /// Cell text by column index; missing columns read as empty.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

/// Read every data row of `path`, header excluded.
pub fn read_table(path: &Path) -> Result<Vec<SourceRow>> {
    if !path.is_file() {
        return Err(SeedError::MissingSource(path.to_path_buf()));
    }

    let rows = match SourceFormat::from_path(path)? {
        SourceFormat::Delimited(delimiter) => read_delimited(path, delimiter)?,
        SourceFormat::Workbook => read_workbook(path)?,
    };

    if rows.is_empty() {
        tracing::warn!("{}: no data rows", path.display());
    }
    Ok(rows)
}

pub fn read_books(path: &Path) -> Result<Vec<RawBookRow>> {
    Ok(read_table(path)?.into_iter().map(RawBookRow::from).collect())
}

pub fn read_ratings(path: &Path) -> Result<Vec<RawRatingRow>> {
    Ok(read_table(path)?.into_iter().map(RawRatingRow::from).collect())
}

fn unreadable(path: &Path, reason: impl ToString) -> SeedError {
    SeedError::UnreadableSource {
        path: PathBuf::from(path),
        reason: reason.to_string(),
    }
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<Vec<SourceRow>> {
    let file = File::open(path).map_err(|e| unreadable(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(file);

    let mut rows = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);
        // Exports from older spreadsheet tools are not always UTF-8.
        let cells = record
            .iter()
            .map(|field| String::from_utf8_lossy(field).into_owned())
            .collect();

        let row = SourceRow { line, cells };
        if !row.is_blank() {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn read_workbook(path: &Path) -> Result<Vec<SourceRow>> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| unreadable(path, "workbook has no sheets"))?;
    let range = workbook.worksheet_range(&sheet)?;
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    let rows = range
        .rows()
        .enumerate()
        .map(|(idx, cells)| SourceRow {
            line: first_row + idx + 1,
            cells: cells.iter().map(cell_text).collect(),
        })
        .filter(|row| !row.is_blank())
        .skip(1)
        .collect();
    Ok(rows)
}

/// Render a cell the way the spreadsheet displays it. Whole-number floats
/// lose their `.0` so `747532699` stays digits only.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e18 => (*f as i64).to_string(),
        other => other.to_string(),
    }
}

/// Workbook fixtures for tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::path::Path;

    use rust_xlsxwriter::Workbook;

    pub(crate) enum Cell {
        Text(&'static str),
        Number(f64),
        Blank,
    }

    /// Write one worksheet per entry of `sheets`, starting at row 0.
    pub(crate) fn write_workbook(path: &Path, sheets: &[&[&[Cell]]]) {
        let mut workbook = Workbook::new();
        for rows in sheets {
            let sheet = workbook.add_worksheet();
            for (r, cells) in rows.iter().enumerate() {
                for (c, cell) in cells.iter().enumerate() {
                    match cell {
                        Cell::Text(text) => {
                            sheet.write_string(r as u32, c as u16, *text).unwrap();
                        }
                        Cell::Number(n) => {
                            sheet.write_number(r as u32, c as u16, *n).unwrap();
                        }
                        Cell::Blank => {}
                    }
                }
            }
        }
        workbook.save(path).unwrap();
    }
}
