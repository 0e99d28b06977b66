//! Excel/ODS file reader using calamine

use crate::error::DumpError;
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod workbook;

pub use workbook::{Cell, CellValue, Sheet, UsedRange};

/// An open workbook.
///
/// Sheet names are read up front; cell data is only loaded for the sheets
/// requested through [`Workbook::load_sheet`]. The underlying file handle is
/// released when the workbook is dropped.
pub struct Workbook {
    path: PathBuf,
    sheet_names: Vec<String>,
    excel: Sheets<BufReader<File>>,
}

impl Workbook {
    /// Open a workbook, failing with [`DumpError::FileNotFound`] if `path` is not a file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DumpError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(DumpError::FileNotFound(path.to_path_buf()));
        }

        let excel: Sheets<_> = open_workbook_auto(path)?;
        let sheet_names = excel.sheet_names();
        debug!(
            path = %path.display(),
            sheets = sheet_names.len(),
            "opened workbook"
        );

        Ok(Self {
            path: path.to_path_buf(),
            sheet_names,
            excel,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// Load the cells of the sheet at `index` (0-based)
    pub fn load_sheet(&mut self, index: usize) -> Result<Sheet, DumpError> {
        let name = self
            .sheet_names
            .get(index)
            .cloned()
            .ok_or_else(|| DumpError::SheetNotFound {
                selector: index.to_string(),
                available: self.sheet_names.clone(),
            })?;

        let range = self.excel.worksheet_range(&name)?;
        Ok(parse_sheet(&name, &range))
    }
}

/// Convert a calamine range into a [`Sheet`] with 1-based coordinates
pub fn parse_sheet(name: &str, range: &Range<Data>) -> Sheet {
    let (start, end) = match (range.start(), range.end()) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Sheet {
                name: name.to_string(),
                cells: HashMap::new(),
                used_range: None,
            };
        }
    };

    let mut cells = HashMap::new();
    for (rel_row, rel_col, data) in range.used_cells() {
        let row = start.0 + rel_row as u32 + 1;
        let col = start.1 + rel_col as u32 + 1;
        cells.insert(
            (row, col),
            Cell {
                row,
                col,
                value: parse_cell_value(data),
            },
        );
    }

    Sheet {
        name: name.to_string(),
        cells,
        used_range: Some(UsedRange {
            first_row: start.0 + 1,
            first_col: start.1 + 1,
            last_row: end.0 + 1,
            last_col: end.1 + 1,
        }),
    }
}

fn parse_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::Empty => CellValue::Empty,
        Data::DateTime(dt) if dt.is_duration() => CellValue::Duration(dt.as_f64().to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => CellValue::DateTime(ndt),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Duration(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    #[test]
    fn test_parse_sheet_offsets_to_one_based() {
        let mut range = Range::new((1, 2), (3, 4));
        range.set_value((1, 2), Data::String("top-left".to_string()));
        range.set_value((3, 4), Data::Float(2.5));

        let sheet = parse_sheet("Offset", &range);

        assert_eq!(sheet.name, "Offset");
        assert_eq!(
            sheet.used_range,
            Some(UsedRange {
                first_row: 2,
                first_col: 3,
                last_row: 4,
                last_col: 5,
            })
        );
        assert_eq!(sheet.display_text(2, 3), "top-left");
        assert_eq!(sheet.display_text(4, 5), "2.5");
        assert_eq!(sheet.cells.len(), 2);
    }

    #[test]
    fn test_parse_empty_range() {
        let range: Range<Data> = Range::empty();
        let sheet = parse_sheet("Blank", &range);

        assert!(sheet.used_range.is_none());
        assert!(sheet.cells.is_empty());
        assert_eq!(sheet.last_row(), 1);
    }

    #[test]
    fn test_parse_cell_values() {
        assert_eq!(parse_cell_value(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(
            parse_cell_value(&Data::Bool(false)),
            CellValue::Boolean(false)
        );
        assert_eq!(
            parse_cell_value(&Data::Error(CellErrorType::Div0)),
            CellValue::Error("#DIV/0!".to_string())
        );
        assert_eq!(
            parse_cell_value(&Data::DurationIso("PT1H".to_string())),
            CellValue::Duration("PT1H".to_string())
        );
        assert!(parse_cell_value(&Data::Empty).is_empty());
    }

    #[test]
    fn test_open_missing_file() {
        let result = Workbook::open("definitely/not/here.xlsx");
        assert!(matches!(result, Err(DumpError::FileNotFound(_))));
    }

    #[test]
    fn test_open_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = Workbook::open(dir.path());
        assert!(matches!(result, Err(DumpError::FileNotFound(_))));
    }

    #[test]
    fn test_open_garbage_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"this is not a zip archive").unwrap();

        let result = Workbook::open(&path);
        assert!(matches!(result, Err(DumpError::Read(_))));
    }
}
