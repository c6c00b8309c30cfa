//! Crawl pipeline: fetch, extract, dedupe, enrich
//!
//! This module contains the core pipeline stages:
//! - Document fetching over HTTP
//! - Record extraction from listing pages
//! - Section-scoped key/value extraction from detail pages
//! - Best-effort attachment retrieval
//! - Page-by-page crawl coordination

mod attachments;
mod coordinator;
mod detail;
mod fetcher;
mod listing;

pub use attachments::{collect_links, download_all, Attachment, AttachmentLink};
pub use coordinator::{CrawlReport, Crawler};
pub use detail::{extract_section, DetailInfo};
pub use fetcher::{build_http_client, fetch_document};
pub use listing::{extract_records, Record};

use crate::config::Config;
use crate::GleanError;

/// Runs a complete crawl with the given configuration
///
/// Drives pagination from the configured start page until a terminal state
/// is reached, and returns everything the run accumulated. Writing the
/// aggregate artifact is the caller's step.
pub async fn crawl(config: Config) -> Result<CrawlReport, GleanError> {
    Crawler::new(config)?.run().await
}
