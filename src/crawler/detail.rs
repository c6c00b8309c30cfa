//! Section-scoped key/value extraction from detail pages
//!
//! The extractor walks the rows of one table as a three-state machine: it
//! collects label/value pairs only between the target section header and the
//! next section header, and a fixed sentinel label in a row's first cell
//! halts the scan outright.

use crate::config::DetailConfig;
use crate::crawler::listing::parse_selector;
use crate::state::ScanState;
use crate::ExtractError;
use scraper::{ElementRef, Html, Selector};

/// Flat label/value data from one named section of a detail page
#[derive(Debug, Clone, Default)]
pub struct DetailInfo {
    entries: Vec<(String, String)>,
}

impl DetailInfo {
    /// Inserts a pair; a later duplicate label overwrites the earlier value
    /// in place
    pub fn insert(&mut self, label: String, value: String) {
        if let Some(slot) = self.entries.iter_mut().find(|(l, _)| *l == label) {
            slot.1 = value;
        } else {
            self.entries.push((label, value));
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    /// Entries in first-insertion order
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct RowSelectors {
    row: Selector,
    cell: Selector,
    header: Selector,
}

/// Extracts the configured section from a detail document
///
/// Returns an empty `DetailInfo` when the table is missing or the target
/// section never appears.
pub fn extract_section(doc: &Html, cfg: &DetailConfig) -> Result<DetailInfo, ExtractError> {
    let table_sel = parse_selector(&cfg.table_selector)?;
    let sels = RowSelectors {
        row: parse_selector("tr")?,
        cell: parse_selector("td")?,
        header: parse_selector(&cfg.header_selector)?,
    };

    let mut info = DetailInfo::default();
    let table = match doc.select(&table_sel).next() {
        Some(table) => table,
        None => return Ok(info),
    };

    let mut state = ScanState::Outside;
    for row in table.select(&sels.row) {
        state = step(state, row, cfg, &sels, &mut info);
        if state.is_terminal() {
            break;
        }
    }

    Ok(info)
}

/// Advances the scan by one row
///
/// Transition order matters: the sentinel halts from any state, a section
/// header repositions the scan, and only then does a data row contribute
/// pairs.
fn step(
    state: ScanState,
    row: ElementRef,
    cfg: &DetailConfig,
    sels: &RowSelectors,
    info: &mut DetailInfo,
) -> ScanState {
    let cells: Vec<ElementRef> = row.select(&sels.cell).collect();

    if cells
        .first()
        .is_some_and(|cell| cell_text(*cell) == cfg.sentinel)
    {
        return ScanState::Done;
    }

    if let Some(header) = row.select(&sels.header).next() {
        return if cell_text(header) == cfg.section {
            ScanState::InSection
        } else {
            ScanState::Outside
        };
    }

    // A 2-, 4-, or 6-cell data row holds 1, 2, or 3 adjacent label/value
    // pairs; any other cell count contributes nothing.
    if state.is_collecting() && matches!(cells.len(), 2 | 4 | 6) {
        for pair in cells.chunks(2) {
            info.insert(cell_text(pair[0]), cell_text(pair[1]));
        }
    }

    state
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail_config() -> DetailConfig {
        DetailConfig {
            table_selector: "table.table-01".to_string(),
            header_selector: "td.sectionHeader-02".to_string(),
            section: "Header Information".to_string(),
            sentinel: "Bill-to Address:".to_string(),
        }
    }

    fn extract(html: &str) -> DetailInfo {
        let doc = Html::parse_document(html);
        extract_section(&doc, &detail_config()).unwrap()
    }

    #[test]
    fn test_section_scan_stops_at_sentinel() {
        let html = r#"
            <table class="table-01">
                <tr><td class="sectionHeader-02">Header Information</td></tr>
                <tr><td>A</td><td>1</td></tr>
                <tr><td>B</td><td>2</td><td>C</td><td>3</td></tr>
                <tr><td>Bill-to Address:</td><td>x</td></tr>
                <tr><td>D</td><td>4</td></tr>
            </table>
        "#;
        let info = extract(html);

        assert_eq!(info.len(), 3);
        assert_eq!(info.get("A"), Some("1"));
        assert_eq!(info.get("B"), Some("2"));
        assert_eq!(info.get("C"), Some("3"));
        assert_eq!(info.get("D"), None);
    }

    #[test]
    fn test_six_cell_row_holds_three_pairs() {
        let html = r#"
            <table class="table-01">
                <tr><td class="sectionHeader-02">Header Information</td></tr>
                <tr><td>A</td><td>1</td><td>B</td><td>2</td><td>C</td><td>3</td></tr>
            </table>
        "#;
        let info = extract(html);

        assert_eq!(info.len(), 3);
        assert_eq!(info.get("C"), Some("3"));
    }

    #[test]
    fn test_rows_outside_target_section_are_ignored() {
        let html = r#"
            <table class="table-01">
                <tr><td class="sectionHeader-02">Other Section</td></tr>
                <tr><td>X</td><td>9</td></tr>
                <tr><td class="sectionHeader-02">Header Information</td></tr>
                <tr><td>A</td><td>1</td></tr>
                <tr><td class="sectionHeader-02">Trailing Section</td></tr>
                <tr><td>Y</td><td>8</td></tr>
            </table>
        "#;
        let info = extract(html);

        assert_eq!(info.len(), 1);
        assert_eq!(info.get("A"), Some("1"));
        assert_eq!(info.get("X"), None);
        assert_eq!(info.get("Y"), None);
    }

    #[test]
    fn test_missing_section_yields_empty_info() {
        let html = r#"
            <table class="table-01">
                <tr><td class="sectionHeader-02">Other Section</td></tr>
                <tr><td>X</td><td>9</td></tr>
            </table>
        "#;
        assert!(extract(html).is_empty());
    }

    #[test]
    fn test_missing_table_yields_empty_info() {
        assert!(extract("<html><body></body></html>").is_empty());
    }

    #[test]
    fn test_sentinel_halts_even_outside_target_section() {
        let html = r#"
            <table class="table-01">
                <tr><td>Bill-to Address:</td><td>x</td></tr>
                <tr><td class="sectionHeader-02">Header Information</td></tr>
                <tr><td>A</td><td>1</td></tr>
            </table>
        "#;
        assert!(extract(html).is_empty());
    }

    #[test]
    fn test_duplicate_label_last_write_wins() {
        let html = r#"
            <table class="table-01">
                <tr><td class="sectionHeader-02">Header Information</td></tr>
                <tr><td>A</td><td>1</td></tr>
                <tr><td>A</td><td>2</td></tr>
            </table>
        "#;
        let info = extract(html);

        assert_eq!(info.len(), 1);
        assert_eq!(info.get("A"), Some("2"));
    }

    #[test]
    fn test_odd_cell_counts_contribute_nothing() {
        let html = r#"
            <table class="table-01">
                <tr><td class="sectionHeader-02">Header Information</td></tr>
                <tr><td>A</td><td>1</td><td>orphan</td></tr>
                <tr><td>B</td><td>2</td></tr>
            </table>
        "#;
        let info = extract(html);

        assert_eq!(info.len(), 1);
        assert_eq!(info.get("B"), Some("2"));
    }

    #[test]
    fn test_entries_keep_first_insertion_order() {
        let html = r#"
            <table class="table-01">
                <tr><td class="sectionHeader-02">Header Information</td></tr>
                <tr><td>Z</td><td>1</td></tr>
                <tr><td>A</td><td>2</td></tr>
                <tr><td>Z</td><td>3</td></tr>
            </table>
        "#;
        let info = extract(html);

        let labels: Vec<&str> = info.entries().iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, ["Z", "A"]);
        assert_eq!(info.get("Z"), Some("3"));
    }
}
