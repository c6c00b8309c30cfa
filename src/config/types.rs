use serde::Deserialize;

/// Main configuration structure for a gleaner run
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub listing: ListingConfig,
    pub schema: SchemaConfig,
    pub detail: DetailConfig,
    pub attachments: AttachmentConfig,
    pub output: OutputConfig,
}

/// Listing page location and pagination
#[derive(Debug, Clone, Deserialize)]
pub struct ListingConfig {
    /// Search results URL; the page number is appended as a query parameter
    pub url: String,

    /// Name of the pagination query parameter
    #[serde(rename = "page-param", default = "default_page_param")]
    pub page_param: String,

    /// First page index to fetch
    #[serde(rename = "start-page", default = "default_start_page")]
    pub start_page: u32,

    /// Base URL that relative detail links are resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// CSS selector for the single results container
    #[serde(rename = "results-selector")]
    pub results_selector: String,

    /// CSS selector for one record row within the container
    #[serde(rename = "row-selector", default = "default_row_selector")]
    pub row_selector: String,
}

/// Column schema for the listing table
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaConfig {
    /// Field names, one per cell, in document order
    pub columns: Vec<String>,

    /// Index of the column whose text is the unique record key
    #[serde(rename = "key-column", default)]
    pub key_column: usize,

    /// Index of the column containing the detail-page anchor
    #[serde(rename = "link-column", default)]
    pub link_column: usize,
}

/// Section markers for detail-page extraction
#[derive(Debug, Clone, Deserialize)]
pub struct DetailConfig {
    /// CSS selector for the table holding the sectioned key/value rows
    #[serde(rename = "table-selector")]
    pub table_selector: String,

    /// CSS selector matching a section-header cell within a row
    #[serde(rename = "header-selector")]
    pub header_selector: String,

    /// Name of the section whose rows are collected
    pub section: String,

    /// First-cell label that halts the scan unconditionally
    pub sentinel: String,
}

/// Attachment link shape and download endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentConfig {
    /// CSS selector for attachment anchors on a detail page
    #[serde(rename = "link-selector")]
    pub link_selector: String,

    /// Delimiter immediately before the embedded document id in the href
    #[serde(rename = "id-start")]
    pub id_start: String,

    /// Delimiter immediately after the embedded document id in the href
    #[serde(rename = "id-end")]
    pub id_end: String,

    /// Download endpoint; the document id is appended as a query parameter
    #[serde(rename = "download-url")]
    pub download_url: String,

    /// Name of the document-id query parameter
    #[serde(rename = "id-param", default = "default_id_param")]
    pub id_param: String,
}

/// Output artifact location and format
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the artifact and per-record attachment folders
    pub folder: String,

    /// File name of the aggregate artifact, overwritten each run
    #[serde(rename = "file-name")]
    pub file_name: String,

    #[serde(default)]
    pub format: OutputFormat,
}

/// Serialization format for the aggregate artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Json
    }
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_start_page() -> u32 {
    1
}

fn default_row_selector() -> String {
    "tr".to_string()
}

fn default_id_param() -> String {
    "docId".to_string()
}
