//! Record extraction from listing pages
//!
//! A listing page holds a single results container whose rows map
//! positionally onto the configured column schema. An absent container or an
//! empty row set is the end-of-pagination signal, not an error; a malformed
//! row is logged and skipped without failing the page.

use crate::config::{ListingConfig, SchemaConfig};
use crate::ExtractError;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

/// One entry from the paginated listing
///
/// Immutable after creation. The key is unique within a run; the link leads
/// to the record's detail page.
#[derive(Debug, Clone)]
pub struct Record {
    pub key: String,

    /// Visible cell values, in schema column order
    pub fields: Vec<(String, String)>,

    pub detail_link: Url,
}

impl Record {
    /// Looks up a field value by column name
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Why one listing row was skipped
#[derive(Debug, Error)]
enum RowSkip {
    #[error("expected {expected} cells, found {found}")]
    CellCount { expected: usize, found: usize },

    #[error("key column is empty")]
    EmptyKey,

    #[error("no anchor in link column")]
    MissingLink,

    #[error("unresolvable detail link '{0}'")]
    BadLink(String),
}

/// Extracts candidate records from a listing document, in document order
///
/// Returns an empty sequence when the results container or its rows are
/// absent; the crawler treats that as the end of pagination.
pub fn extract_records(
    doc: &Html,
    base: &Url,
    listing: &ListingConfig,
    schema: &SchemaConfig,
) -> Result<Vec<Record>, ExtractError> {
    let container_sel = parse_selector(&listing.results_selector)?;
    let row_sel = parse_selector(&listing.row_selector)?;
    let cell_sel = parse_selector("td")?;
    let anchor_sel = parse_selector("a[href]")?;

    let container = match doc.select(&container_sel).next() {
        Some(container) => container,
        None => return Ok(Vec::new()),
    };

    let mut records = Vec::new();
    for row in container.select(&row_sel) {
        match row_record(row, base, schema, &cell_sel, &anchor_sel) {
            Ok(record) => records.push(record),
            Err(skip) => tracing::warn!("skipping listing row: {}", skip),
        }
    }

    Ok(records)
}

/// Reads one row positionally per the schema
fn row_record(
    row: ElementRef,
    base: &Url,
    schema: &SchemaConfig,
    cell_sel: &Selector,
    anchor_sel: &Selector,
) -> Result<Record, RowSkip> {
    let cells: Vec<ElementRef> = row.select(cell_sel).collect();
    if cells.len() < schema.columns.len() {
        return Err(RowSkip::CellCount {
            expected: schema.columns.len(),
            found: cells.len(),
        });
    }

    let mut fields = Vec::with_capacity(schema.columns.len());
    for (name, cell) in schema.columns.iter().zip(&cells) {
        fields.push((name.clone(), cell_text(*cell)));
    }

    let key = fields[schema.key_column].1.clone();
    if key.is_empty() {
        return Err(RowSkip::EmptyKey);
    }

    let href = cells[schema.link_column]
        .select(anchor_sel)
        .next()
        .and_then(|a| a.value().attr("href"))
        .ok_or(RowSkip::MissingLink)?;

    let detail_link = base
        .join(href.trim())
        .map_err(|_| RowSkip::BadLink(href.to_string()))?;

    Ok(Record {
        key,
        fields,
        detail_link,
    })
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

pub(crate) fn parse_selector(raw: &str) -> Result<Selector, ExtractError> {
    Selector::parse(raw).map_err(|_| ExtractError::Selector(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ListingConfig, SchemaConfig};

    fn listing_config() -> ListingConfig {
        ListingConfig {
            url: "https://example.com/search".to_string(),
            page_param: "page".to_string(),
            start_page: 1,
            base_url: "https://example.com".to_string(),
            results_selector: "tbody[id='results']".to_string(),
            row_selector: "tr".to_string(),
        }
    }

    fn schema() -> SchemaConfig {
        SchemaConfig {
            columns: vec![
                "Bid Solicitation #".to_string(),
                "Buyer".to_string(),
                "Description".to_string(),
            ],
            key_column: 0,
            link_column: 0,
        }
    }

    fn base() -> Url {
        Url::parse("https://example.com").unwrap()
    }

    fn extract(html: &str) -> Vec<Record> {
        let doc = Html::parse_document(html);
        extract_records(&doc, &base(), &listing_config(), &schema()).unwrap()
    }

    #[test]
    fn test_extracts_records_in_document_order() {
        let html = r#"
            <table><tbody id="results">
                <tr>
                    <td><a href="/bids/100">RFP-100</a></td>
                    <td>Alice</td>
                    <td>Road repair</td>
                </tr>
                <tr>
                    <td><a href="/bids/101">RFP-101</a></td>
                    <td>Bob</td>
                    <td>Bridge paint</td>
                </tr>
            </tbody></table>
        "#;
        let records = extract(html);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key, "RFP-100");
        assert_eq!(records[1].key, "RFP-101");
        assert_eq!(records[0].field("Buyer"), Some("Alice"));
        assert_eq!(
            records[0].detail_link.as_str(),
            "https://example.com/bids/100"
        );
    }

    #[test]
    fn test_fields_follow_schema_order() {
        let html = r#"
            <table><tbody id="results">
                <tr>
                    <td><a href="/bids/100">RFP-100</a></td>
                    <td>Alice</td>
                    <td>Road repair</td>
                </tr>
            </tbody></table>
        "#;
        let records = extract(html);

        let names: Vec<&str> = records[0].fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["Bid Solicitation #", "Buyer", "Description"]);
    }

    #[test]
    fn test_missing_container_is_empty_sequence() {
        let html = "<html><body><p>Nothing here</p></body></html>";
        assert!(extract(html).is_empty());
    }

    #[test]
    fn test_container_without_rows_is_empty_sequence() {
        let html = r#"<table><tbody id="results"></tbody></table>"#;
        assert!(extract(html).is_empty());
    }

    #[test]
    fn test_short_row_is_skipped_not_fatal() {
        let html = r#"
            <table><tbody id="results">
                <tr><td>only one cell</td></tr>
                <tr>
                    <td><a href="/bids/100">RFP-100</a></td>
                    <td>Alice</td>
                    <td>Road repair</td>
                </tr>
            </tbody></table>
        "#;
        let records = extract(html);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, "RFP-100");
    }

    #[test]
    fn test_row_without_anchor_is_skipped() {
        let html = r#"
            <table><tbody id="results">
                <tr>
                    <td>RFP-100</td>
                    <td>Alice</td>
                    <td>Road repair</td>
                </tr>
            </tbody></table>
        "#;
        assert!(extract(html).is_empty());
    }

    #[test]
    fn test_row_with_empty_key_is_skipped() {
        let html = r#"
            <table><tbody id="results">
                <tr>
                    <td><a href="/bids/100"> </a></td>
                    <td>Alice</td>
                    <td>Road repair</td>
                </tr>
            </tbody></table>
        "#;
        assert!(extract(html).is_empty());
    }

    #[test]
    fn test_absolute_detail_link_kept_as_is() {
        let html = r#"
            <table><tbody id="results">
                <tr>
                    <td><a href="https://other.example/bids/7">RFP-7</a></td>
                    <td>Carol</td>
                    <td>Fencing</td>
                </tr>
            </tbody></table>
        "#;
        let records = extract(html);
        assert_eq!(
            records[0].detail_link.as_str(),
            "https://other.example/bids/7"
        );
    }

    #[test]
    fn test_extra_cells_are_tolerated() {
        let html = r#"
            <table><tbody id="results">
                <tr>
                    <td><a href="/bids/100">RFP-100</a></td>
                    <td>Alice</td>
                    <td>Road repair</td>
                    <td>2026-09-01</td>
                </tr>
            </tbody></table>
        "#;
        let records = extract(html);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fields.len(), 3);
    }

    #[test]
    fn test_invalid_results_selector_is_extraction_error() {
        let mut listing = listing_config();
        listing.results_selector = "td[".to_string();
        let doc = Html::parse_document("<html></html>");

        let result = extract_records(&doc, &base(), &listing, &schema());
        assert!(matches!(result.unwrap_err(), ExtractError::Selector(_)));
    }
}
