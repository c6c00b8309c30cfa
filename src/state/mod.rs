//! Explicit state machines for the crawl loop and the detail-section scan

mod crawl;
mod scan;

pub use crawl::{CrawlEnd, CrawlState, DedupeTracker, PageFailure, PageOutcome};
pub use scan::ScanState;
