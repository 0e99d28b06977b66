//! Sheet selection from a user-supplied selector string

use crate::config::DumpConfig;
use crate::error::DumpError;
use tracing::debug;

/// How a selector string was interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorKind {
    /// The all-sheets keyword
    AllSheets,
    /// A non-negative integer; falls back to a name match when out of range
    Index(usize),
    /// Free text matched case-insensitively against sheet names
    Name,
}

/// A parsed sheet selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSelector {
    raw: String,
    kind: SelectorKind,
}

impl SheetSelector {
    /// Classify `raw` once; resolution never re-parses it
    pub fn parse(raw: &str, config: &DumpConfig) -> Self {
        let kind = if raw.to_lowercase() == config.all_keyword.to_lowercase() {
            SelectorKind::AllSheets
        } else if let Some(index) = parse_index(raw) {
            SelectorKind::Index(index)
        } else {
            SelectorKind::Name
        };

        Self {
            raw: raw.to_string(),
            kind,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> &SelectorKind {
        &self.kind
    }

    /// Resolve against the workbook's sheet names, returning 0-based indices in dump order
    pub fn resolve(&self, sheet_names: &[String]) -> Result<Vec<usize>, DumpError> {
        let selected = match self.kind {
            SelectorKind::AllSheets => (0..sheet_names.len()).collect(),
            SelectorKind::Index(index) if index < sheet_names.len() => vec![index],
            SelectorKind::Index(_) | SelectorKind::Name => {
                find_by_name(&self.raw, sheet_names).into_iter().collect()
            }
        };

        if selected.is_empty() {
            return Err(DumpError::SheetNotFound {
                selector: self.raw.clone(),
                available: sheet_names.to_vec(),
            });
        }

        debug!(selector = %self.raw, kind = ?self.kind, sheets = ?selected, "resolved selector");
        Ok(selected)
    }
}

/// Parse a base-10 integer, allowing surrounding whitespace and a sign.
///
/// Negative values are not indices; `-0` is index 0.
pub fn parse_index(raw: &str) -> Option<usize> {
    let value = raw.trim().parse::<i64>().ok()?;
    usize::try_from(value).ok()
}

/// First sheet whose non-blank name contains `needle`, ignoring case
fn find_by_name(needle: &str, sheet_names: &[String]) -> Option<usize> {
    let needle = needle.to_lowercase();
    sheet_names
        .iter()
        .position(|name| !name.trim().is_empty() && name.to_lowercase().contains(&needle))
}
