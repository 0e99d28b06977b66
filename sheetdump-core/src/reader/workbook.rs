//! Workbook data structures

use chrono::{NaiveDateTime, NaiveTime};
use std::collections::HashMap;

/// Bounding rectangle of the cells a sheet reports as used (1-based, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsedRange {
    pub first_row: u32,
    pub first_col: u32,
    pub last_row: u32,
    pub last_col: u32,
}

/// Represents a worksheet
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    /// Cells keyed by 1-based `(row, col)`
    pub cells: HashMap<(u32, u32), Cell>,
    pub used_range: Option<UsedRange>,
}

impl Sheet {
    /// Get a cell at the given 1-based position
    pub fn get_cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Display text of the cell at `(row, col)`, empty when there is no cell
    pub fn display_text(&self, row: u32, col: u32) -> String {
        self.get_cell(row, col)
            .map(|c| c.value.display_text())
            .unwrap_or_default()
    }

    /// Last used row, or 1 if the sheet reports no dimension
    pub fn last_row(&self) -> u32 {
        self.used_range.map(|r| r.last_row).unwrap_or(1)
    }

    /// Last used column, or 1 if the sheet reports no dimension
    pub fn last_col(&self) -> u32 {
        self.used_range.map(|r| r.last_col).unwrap_or(1)
    }
}

/// Represents a single cell
#[derive(Debug, Clone)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
    pub value: CellValue,
}

/// Cell value types
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    Error(String),
    DateTime(NaiveDateTime),
    Duration(String),
}

impl CellValue {
    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Render the value the way a spreadsheet shows it by default
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => format_general(*n),
            CellValue::Text(s) | CellValue::Error(s) | CellValue::Duration(s) => s.clone(),
            CellValue::Boolean(true) => "TRUE".to_string(),
            CellValue::Boolean(false) => "FALSE".to_string(),
            CellValue::DateTime(dt) => {
                if NaiveTime::from_hms_opt(0, 0, 0) == Some(dt.time()) {
                    dt.format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
        }
    }
}

/// Significant digits shown by the spreadsheet "General" number format
const GENERAL_DIGITS: i32 = 11;

/// Format a number like the "General" format: up to 11 significant digits,
/// scientific notation (`1.23457E+11`) outside the fixed-point range.
pub fn format_general(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if !n.is_finite() {
        return n.to_string();
    }

    let exponent = n.abs().log10().floor() as i32;
    if (-9..GENERAL_DIGITS).contains(&exponent) {
        let decimals = (GENERAL_DIGITS - 1 - exponent).max(0) as usize;
        return trim_fraction(&format!("{:.*}", decimals, n));
    }

    let scientific = format!("{:.5e}", n);
    let (mantissa, exp) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{}E{}{:02}", trim_fraction(mantissa), sign, exp.abs())
}

fn trim_fraction(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}
