//! Per-sheet selection configuration.
//!
//! Every option is enumerated with an explicit default: an absent sheet entry
//! means "whole detected extent, first row is the header".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Selection options for one sheet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetSelection {
    /// Range notation such as "B3:E20"; empty means the whole detected extent
    pub range: String,
    /// Whether row 0 of the selected rectangle is the header row
    pub first_row_is_header: bool,
}

impl Default for SheetSelection {
    fn default() -> Self {
        SheetSelection {
            range: String::new(),
            first_row_is_header: true,
        }
    }
}

/// Sheet-name-keyed selection configuration for a whole workbook.
/// Missing sheets resolve to the default selection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkbookSelection {
    sheets: BTreeMap<String, SheetSelection>,
}

impl WorkbookSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves one sheet's selection, defaulting when absent.
    pub fn sheet(&self, name: &str) -> SheetSelection {
        self.sheets.get(name).cloned().unwrap_or_default()
    }

    /// Stores a sheet's range. Returns true when the stored value changed,
    /// which is the signal to re-apply and re-sync.
    pub fn set_range(&mut self, name: &str, range: &str) -> bool {
        let entry = self.sheets.entry(name.to_owned()).or_default();
        if entry.range == range {
            return false;
        }
        entry.range = range.to_owned();
        true
    }

    /// Stores a sheet's header flag. Returns true when the stored value changed.
    pub fn set_first_row_is_header(&mut self, name: &str, value: bool) -> bool {
        let entry = self.sheets.entry(name.to_owned()).or_default();
        if entry.first_row_is_header == value {
            return false;
        }
        entry.first_row_is_header = value;
        true
    }

    /// Drops configuration for sheets not in the given name set.
    pub fn retain_sheets(&mut self, names: &[String]) {
        self.sheets.retain(|name, _| names.contains(name));
    }

    /// Iterates the explicitly configured sheets.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SheetSelection)> {
        self.sheets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_sheet_resolves_to_defaults() {
        let selection = WorkbookSelection::new();
        let config = selection.sheet("People");
        assert_eq!(config.range, "");
        assert!(config.first_row_is_header);
    }

    #[test]
    fn set_range_reports_changes_only() {
        let mut selection = WorkbookSelection::new();
        assert!(selection.set_range("People", "A1:B3"));
        assert!(!selection.set_range("People", "A1:B3"));
        assert!(selection.set_range("People", "A1:B4"));
        assert_eq!(selection.sheet("People").range, "A1:B4");
    }

    #[test]
    fn set_header_flag_reports_changes_only() {
        let mut selection = WorkbookSelection::new();
        // The default is already true
        assert!(!selection.set_first_row_is_header("People", true));
        assert!(selection.set_first_row_is_header("People", false));
        assert!(!selection.sheet("People").first_row_is_header);
    }

    #[test]
    fn range_edits_keep_the_header_flag() {
        let mut selection = WorkbookSelection::new();
        selection.set_first_row_is_header("People", false);
        selection.set_range("People", "A2:B3");
        let config = selection.sheet("People");
        assert_eq!(config.range, "A2:B3");
        assert!(!config.first_row_is_header);
    }

    #[test]
    fn retain_drops_unknown_sheets() {
        let mut selection = WorkbookSelection::new();
        selection.set_range("Old", "A1:B2");
        selection.set_range("Kept", "C1:D2");
        selection.retain_sheets(&["Kept".to_owned()]);
        assert_eq!(selection.sheet("Old").range, "");
        assert_eq!(selection.sheet("Kept").range, "C1:D2");
    }

    #[test]
    fn round_trips_through_serde() {
        let mut selection = WorkbookSelection::new();
        selection.set_range("People", "B2:C9");
        selection.set_first_row_is_header("People", false);
        let json = serde_json::to_string(&selection).unwrap();
        let back: WorkbookSelection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, selection);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let config: SheetSelection = serde_json::from_str("{\"range\":\"A1:B2\"}").unwrap();
        assert!(config.first_row_is_header);
    }
}
