//! Best-effort attachment retrieval
//!
//! Attachment anchors carry an embedded document id inside their href
//! payload. Link discovery is separated from downloading so the parsed
//! document never has to live across a network call. Every failure is
//! recorded per attachment; the loop always proceeds to the next one.

use crate::config::AttachmentConfig;
use crate::crawler::listing::parse_selector;
use crate::{AttachmentError, ExtractError};
use reqwest::Client;
use scraper::Html;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use url::Url;

/// A file linked from a detail page, downloaded to a record-specific
/// destination
#[derive(Debug, Clone)]
pub struct Attachment {
    pub display_name: String,
    pub source_id: String,
    pub local_path: PathBuf,
}

/// An attachment anchor found on a detail page, not yet resolved or fetched
#[derive(Debug, Clone)]
pub struct AttachmentLink {
    pub display_name: String,
    pub href: String,
}

/// Collects attachment anchors from a detail document
///
/// Anchors without an href or without display text are ignored; the display
/// text becomes the file name, so there is nothing to save them under.
pub fn collect_links(
    doc: &Html,
    cfg: &AttachmentConfig,
) -> Result<Vec<AttachmentLink>, ExtractError> {
    let link_sel = parse_selector(&cfg.link_selector)?;

    let links = doc
        .select(&link_sel)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let display_name = anchor.text().collect::<String>().trim().to_string();
            if display_name.is_empty() {
                return None;
            }
            Some(AttachmentLink {
                display_name,
                href: href.to_string(),
            })
        })
        .collect();

    Ok(links)
}

/// Downloads every discovered attachment into `dest`
///
/// The destination directory is created if absent. Failures are logged and
/// skipped; the successfully saved attachments are returned.
pub async fn download_all(
    client: &Client,
    cfg: &AttachmentConfig,
    links: &[AttachmentLink],
    dest: &Path,
) -> Vec<Attachment> {
    if let Err(e) = std::fs::create_dir_all(dest) {
        tracing::warn!("cannot create {}: {}", dest.display(), e);
        return Vec::new();
    }

    let mut saved = Vec::new();
    for link in links {
        match download_one(client, cfg, link, dest).await {
            Ok(attachment) => {
                tracing::info!(
                    "saved attachment {} to {}",
                    attachment.display_name,
                    attachment.local_path.display()
                );
                saved.push(attachment);
            }
            Err(e) => {
                tracing::warn!("attachment '{}' failed: {}", link.display_name, e);
            }
        }
    }

    saved
}

/// Resolves one link to its download URL and streams the body to disk
async fn download_one(
    client: &Client,
    cfg: &AttachmentConfig,
    link: &AttachmentLink,
    dest: &Path,
) -> Result<Attachment, AttachmentError> {
    let source_id = embedded_id(&link.href, &cfg.id_start, &cfg.id_end).ok_or_else(|| {
        AttachmentError::MissingId {
            href: link.href.clone(),
        }
    })?;

    let url = download_url(cfg, &source_id)?;
    tracing::debug!("downloading {} from {}", link.display_name, url);

    let mut response =
        client
            .get(url.as_str())
            .send()
            .await
            .map_err(|source| AttachmentError::Request {
                url: url.to_string(),
                source,
            })?;

    let status = response.status();
    if !status.is_success() {
        return Err(AttachmentError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let local_path = dest.join(&link.display_name);
    let mut file =
        tokio::fs::File::create(&local_path)
            .await
            .map_err(|source| AttachmentError::Write {
                path: local_path.clone(),
                source,
            })?;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|source| AttachmentError::Request {
            url: url.to_string(),
            source,
        })?
    {
        file.write_all(&chunk)
            .await
            .map_err(|source| AttachmentError::Write {
                path: local_path.clone(),
                source,
            })?;
    }

    file.flush().await.map_err(|source| AttachmentError::Write {
        path: local_path.clone(),
        source,
    })?;

    Ok(Attachment {
        display_name: link.display_name.clone(),
        source_id,
        local_path,
    })
}

/// Builds the download URL for an embedded document id
fn download_url(cfg: &AttachmentConfig, source_id: &str) -> Result<Url, AttachmentError> {
    let mut url = Url::parse(&cfg.download_url)?;
    url.query_pairs_mut().append_pair(&cfg.id_param, source_id);
    Ok(url)
}

/// Extracts the substring between the configured delimiter pair
fn embedded_id(href: &str, start: &str, end: &str) -> Option<String> {
    let tail = &href[href.find(start)? + start.len()..];
    let id = &tail[..tail.find(end)?];
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
