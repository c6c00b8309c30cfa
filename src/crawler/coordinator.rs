//! Crawl coordinator - pagination and termination decisions
//!
//! The coordinator drives page iteration strictly sequentially: one listing
//! fetch, then one detail fetch and its downloads per new record, then the
//! next page. It owns the run's mutable state and decides when to stop:
//! an empty page, a resurfaced record key, or an unreadable page.

use crate::config::Config;
use crate::crawler::attachments::{collect_links, download_all};
use crate::crawler::detail::{extract_section, DetailInfo};
use crate::crawler::fetcher::{build_http_client, fetch_document};
use crate::crawler::listing::{extract_records, Record};
use crate::state::{CrawlEnd, CrawlState, PageOutcome};
use crate::GleanError;
use reqwest::Client;
use std::path::Path;
use url::Url;

/// Orchestrates page-by-page traversal for one run
pub struct Crawler {
    config: Config,
    client: Client,
    listing_url: Url,
    base: Url,
}

/// Everything a finished run produced
#[derive(Debug)]
pub struct CrawlReport {
    /// Enriched records in discovery order, each key exactly once
    pub accumulated: Vec<(Record, DetailInfo)>,

    /// The terminal pagination state that ended the run
    pub end: CrawlEnd,

    pub pages_fetched: u32,
    pub attachments_saved: usize,
}

impl Crawler {
    /// Creates a crawler from a validated configuration
    pub fn new(config: Config) -> Result<Self, GleanError> {
        let client = build_http_client()?;
        let listing_url = Url::parse(&config.listing.url)?;
        let base = Url::parse(&config.listing.base_url)?;

        Ok(Self {
            config,
            client,
            listing_url,
            base,
        })
    }

    /// Runs the crawl to a terminal state and returns the accumulated result
    ///
    /// Page and record failures never escape as errors here; they are folded
    /// into the terminal state or logged per record. The `Err` arm is
    /// reserved for construction-level problems surfaced by `crawl`.
    pub async fn run(self) -> Result<CrawlReport, GleanError> {
        let mut state = CrawlState::new(self.config.listing.start_page);
        let mut pages_fetched = 0u32;
        let mut attachments_saved = 0usize;

        let end = loop {
            let page = state.page;
            tracing::info!("scraping page {}", page);
            pages_fetched += 1;

            match self.load_page(page).await {
                PageOutcome::Failed(failure) => {
                    tracing::error!("page {} could not be read: {}", page, failure);
                    break CrawlEnd::PageFailed { page, failure };
                }
                PageOutcome::EndOfData => {
                    tracing::info!("no records on page {}, stopping", page);
                    break CrawlEnd::Empty { page };
                }
                PageOutcome::Records(records) => {
                    tracing::debug!("page {} yielded {} records", page, records.len());

                    // The listing is assumed monotonically ordered by
                    // insertion: once a seen key resurfaces, nothing unseen
                    // can follow, on this page or any later one.
                    let mut resurfaced = None;
                    for record in records {
                        if !state.dedupe.first_sighting(&record.key) {
                            resurfaced = Some(record.key);
                            break;
                        }

                        tracing::info!("processing record {}", record.key);
                        let (detail, saved) = self.enrich(&record).await;
                        attachments_saved += saved;
                        state.accumulated.push((record, detail));
                    }

                    if let Some(key) = resurfaced {
                        tracing::info!("record {} already seen on an earlier page, stopping", key);
                        break CrawlEnd::Duplicate { page, key };
                    }

                    state.page += 1;
                }
            }
        };

        tracing::info!(
            "crawl finished ({}): {} records, {} attachments, {} pages",
            end,
            state.accumulated.len(),
            attachments_saved,
            pages_fetched
        );

        Ok(CrawlReport {
            accumulated: state.accumulated,
            end,
            pages_fetched,
            attachments_saved,
        })
    }

    /// Fetches one listing page and classifies the result
    async fn load_page(&self, page: u32) -> PageOutcome {
        let url = self.page_url(page);
        tracing::debug!("listing URL: {}", url);

        let doc = match fetch_document(&self.client, url.as_str()).await {
            Ok(doc) => doc,
            Err(e) => return PageOutcome::Failed(e.into()),
        };

        match extract_records(&doc, &self.base, &self.config.listing, &self.config.schema) {
            Ok(records) if records.is_empty() => PageOutcome::EndOfData,
            Ok(records) => PageOutcome::Records(records),
            Err(e) => PageOutcome::Failed(e.into()),
        }
    }

    /// Best-effort detail and attachment enrichment for one new record
    ///
    /// The detail page is fetched once and feeds both the section scan and
    /// attachment discovery. A failure here degrades the record (empty
    /// detail, no attachments) instead of stopping the crawl.
    async fn enrich(&self, record: &Record) -> (DetailInfo, usize) {
        let links;
        let detail;
        {
            let doc = match fetch_document(&self.client, record.detail_link.as_str()).await {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::warn!("detail page for {} unavailable: {}", record.key, e);
                    return (DetailInfo::default(), 0);
                }
            };

            detail = match extract_section(&doc, &self.config.detail) {
                Ok(detail) => detail,
                Err(e) => {
                    tracing::warn!("detail extraction for {} failed: {}", record.key, e);
                    DetailInfo::default()
                }
            };

            links = match collect_links(&doc, &self.config.attachments) {
                Ok(links) => links,
                Err(e) => {
                    tracing::warn!("attachment discovery for {} failed: {}", record.key, e);
                    Vec::new()
                }
            };
        }

        let dest = Path::new(&self.config.output.folder).join(&record.key);
        let saved = download_all(&self.client, &self.config.attachments, &links, &dest).await;

        (detail, saved.len())
    }

    /// Builds the listing URL for a page index
    fn page_url(&self, page: u32) -> Url {
        let mut url = self.listing_url.clone();
        url.query_pairs_mut()
            .append_pair(&self.config.listing.page_param, &page.to_string());
        url
    }
}
