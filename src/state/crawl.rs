//! Pagination state: per-page outcomes, terminal states, and the mutable
//! crawl aggregate owned by the crawler loop.

use crate::crawler::{DetailInfo, Record};
use crate::{ExtractError, FetchError};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Why a listing page could not be interpreted
#[derive(Debug, Error)]
pub enum PageFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Result of loading one listing page
///
/// This is deliberately a three-way split so the crawler can tell "no more
/// pages" apart from "this page failed to load".
#[derive(Debug)]
pub enum PageOutcome {
    /// The page yielded records, in document order
    Records(Vec<Record>),

    /// The listing has run out of pages (normal end of pagination)
    EndOfData,

    /// The page could not be fetched or interpreted
    Failed(PageFailure),
}

/// Terminal pagination states
#[derive(Debug)]
pub enum CrawlEnd {
    /// A listing page extracted to an empty sequence
    Empty { page: u32 },

    /// An already-seen key resurfaced; earlier pages cover everything beyond it
    Duplicate { page: u32, key: String },

    /// A page fetch or extraction failed in a way that prevented reading it
    PageFailed { page: u32, failure: PageFailure },
}

impl CrawlEnd {
    /// Returns true if the crawl ended without an unrecovered page failure
    pub fn is_clean(&self) -> bool {
        !matches!(self, Self::PageFailed { .. })
    }
}

impl fmt::Display for CrawlEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { page } => write!(f, "no records on page {}", page),
            Self::Duplicate { page, key } => {
                write!(f, "record {} on page {} was seen on an earlier page", key, page)
            }
            Self::PageFailed { page, failure } => {
                write!(f, "page {} could not be read: {}", page, failure)
            }
        }
    }
}

/// The set of already-seen record keys
///
/// Once a key is recorded it is never reprocessed or re-downloaded.
#[derive(Debug, Default)]
pub struct DedupeTracker {
    seen: HashSet<String>,
}

impl DedupeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key` and reports whether this is its first sighting
    pub fn first_sighting(&mut self, key: &str) -> bool {
        self.seen.insert(key.to_owned())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Mutable per-run crawl state
///
/// Owned exclusively by the crawler loop and discarded once the output
/// writer has consumed the accumulated records.
#[derive(Debug)]
pub struct CrawlState {
    /// Index of the listing page to fetch next
    pub page: u32,

    /// Keys of records already processed this run
    pub dedupe: DedupeTracker,

    /// Enriched records in the order they were discovered
    pub accumulated: Vec<(Record, DetailInfo)>,
}

impl CrawlState {
    pub fn new(start_page: u32) -> Self {
        Self {
            page: start_page,
            dedupe: DedupeTracker::new(),
            accumulated: Vec::new(),
        }
    }
}
