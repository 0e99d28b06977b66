//! sheetdump-core: plain-text dumps of spreadsheet sheets
//!
//! Opens Excel/ODS workbooks through calamine, resolves a sheet selector
//! (the all-sheets keyword, a 0-based index, or a name fragment) and renders
//! each selected sheet as tab-delimited `R001:\t[a]\t[b]` lines meant for
//! reading and diffing.

pub mod config;
pub mod dumper;
pub mod error;
pub mod reader;
pub mod selector;

use std::io::Write;
use std::path::Path;
use tracing::debug;

pub use config::DumpConfig;
pub use dumper::{dump_sheet, normalize_cell_text, render_row};
pub use error::{ConfigError, DumpError};
pub use reader::{Sheet, Workbook};
pub use selector::{SelectorKind, SheetSelector};

/// Main dump interface
pub struct Dumper {
    config: DumpConfig,
}

impl Dumper {
    /// Create a new dumper with default configuration
    pub fn new() -> Self {
        Self::with_config(DumpConfig::default())
    }

    /// Create a new dumper with custom configuration
    pub fn with_config(config: DumpConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DumpConfig {
        &self.config
    }

    /// Dump the sheets of `path` picked by `selector` into `out`.
    ///
    /// Selection happens before anything is written, so a selector that
    /// matches nothing produces no output. Returns the number of sheets dumped.
    pub fn dump_file<P: AsRef<Path>, W: Write>(
        &self,
        path: P,
        selector: &str,
        out: &mut W,
    ) -> Result<usize, DumpError> {
        let mut workbook = Workbook::open(path)?;
        let selector = SheetSelector::parse(selector, &self.config);
        let indices = selector.resolve(workbook.sheet_names())?;

        for (position, &index) in indices.iter().enumerate() {
            let sheet = workbook.load_sheet(index)?;
            if position > 0 {
                writeln!(out)?;
            }
            dump_sheet(out, &sheet, self.config.max_columns)?;
        }

        out.flush()?;
        debug!(path = %workbook.path().display(), sheets = indices.len(), "dump complete");
        Ok(indices.len())
    }
}

impl Default for Dumper {
    fn default() -> Self {
        Self::new()
    }
}
