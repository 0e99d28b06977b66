//! Tab-delimited text rendering of sheets

use crate::reader::Sheet;
use regex::{NoExpand, Regex};
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Line breaks, both real and already escaped by the file producer
pub const NEWLINE_PATTERN: &str = r"\r\n?|\n|\\n|\\r";

/// Visible placeholder written in place of every line break
pub const ESCAPED_NEWLINE: &str = r"\n";

const EMPTY_CELL: &str = "[]";

fn newline_regex() -> &'static Regex {
    static NEWLINE_RE: OnceLock<Regex> = OnceLock::new();
    NEWLINE_RE.get_or_init(|| Regex::new(NEWLINE_PATTERN).unwrap())
}

/// Trim a cell's display text and collapse every newline variant into `\n`
pub fn normalize_cell_text(text: &str) -> String {
    newline_regex()
        .replace_all(text.trim(), NoExpand(ESCAPED_NEWLINE))
        .into_owned()
}

/// Render one row of raw display texts as `R001:\t[a]\t[b]`.
///
/// Returns `None` when every cell is empty. Trailing empty cells are dropped;
/// leading and interior ones are kept so columns stay aligned.
pub fn render_row<S: AsRef<str>>(row: u32, texts: &[S]) -> Option<String> {
    let cells: Vec<String> = texts
        .iter()
        .map(|text| format!("[{}]", normalize_cell_text(text.as_ref())))
        .collect();

    let last = cells.iter().rposition(|cell| cell != EMPTY_CELL)?;
    Some(format!("R{:03}:\t{}", row, cells[..=last].join("\t")))
}

/// Write the header and every non-blank row of `sheet`, returning the number of rows written
pub fn dump_sheet<W: Write>(out: &mut W, sheet: &Sheet, max_columns: u32) -> io::Result<usize> {
    let max_row = sheet.last_row();
    let max_col = sheet.last_col().min(max_columns);
    if sheet.last_col() > max_columns {
        warn!(
            sheet = %sheet.name,
            columns = sheet.last_col(),
            max_columns,
            "sheet is wider than the column cap, extra columns are skipped"
        );
    }

    writeln!(out, "--- DUMPING SHEET: {} ---", sheet.name)?;

    let mut written = 0;
    let mut texts = Vec::with_capacity(max_col as usize);
    for row in 1..=max_row {
        texts.clear();
        texts.extend((1..=max_col).map(|col| sheet.display_text(row, col)));

        if let Some(line) = render_row(row, &texts) {
            writeln!(out, "{}", line)?;
            written += 1;
        }
    }

    info!(sheet = %sheet.name, rows = written, max_row, max_col, "dumped sheet");
    Ok(written)
}
