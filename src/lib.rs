//! Gleaner: a paginated listing harvester
//!
//! This crate crawls a paginated listing of structured records, enriches each
//! record with detail-page information and linked file attachments,
//! deduplicates records across pages, and persists the aggregate as a single
//! artifact. Site-specific selectors and the output format are configuration,
//! not code.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for gleaner operations
#[derive(Debug, Error)]
pub enum GleanError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector in config: {0}")]
    InvalidSelector(String),
}

/// A document retrieval that did not produce a usable document.
///
/// Fetch failures are surfaced to the caller as values; nothing in this
/// crate retries or escalates them on its own.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read body from {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

/// Expected document structure was absent or unusable.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid CSS selector '{0}'")]
    Selector(String),
}

/// A single attachment retrieval or write failure.
///
/// Always isolated per attachment: one failure never aborts the record or
/// the crawl.
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("no embedded document id in href '{href}'")]
    MissingId { href: String },

    #[error("invalid download URL: {0}")]
    Url(#[from] ::url::ParseError),

    #[error("download from {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to write {path}: {source}")]
    Write {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for gleaner operations
pub type Result<T> = std::result::Result<T, GleanError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlReport, Crawler};
pub use state::{CrawlEnd, DedupeTracker, PageOutcome, ScanState};
