// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Post payload normalization and content addressing.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{CONTENT_HASH_DOMAIN, MAX_IMAGES, MAX_LINKS, MAX_TEXT_CHARS};
use crate::error::{TipError, TipResult};
use crate::types::ContentHash;

/// A post as submitted by a client.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPayload {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// A post in canonical form. Only values of this type are ever hashed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedPost {
    pub text: String,
    pub links: Vec<String>,
    pub images: Vec<String>,
}

impl PostPayload {
    pub fn normalize(&self) -> TipResult<NormalizedPost> {
        let text = self.text.trim().to_string();
        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(TipError::invalid(format!(
                "text too long (max {} chars)",
                MAX_TEXT_CHARS
            )));
        }

        let links = normalize_urls(&self.links, "link")?;
        if links.len() > MAX_LINKS {
            return Err(TipError::invalid(format!("too many links (max {})", MAX_LINKS)));
        }

        let images = normalize_urls(&self.images, "image")?;
        if images.len() > MAX_IMAGES {
            return Err(TipError::invalid(format!("too many images (max {})", MAX_IMAGES)));
        }

        if text.is_empty() && links.is_empty() && images.is_empty() {
            return Err(TipError::invalid("empty post"));
        }

        Ok(NormalizedPost { text, links, images })
    }
}

/// Trims, drops blanks, requires absolute http(s) URLs and removes duplicates
/// keeping first occurrence.
fn normalize_urls(raw: &[String], what: &str) -> TipResult<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for entry in raw {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            continue;
        }
        let url = Url::parse(trimmed).map_err(|_| TipError::invalid(format!("invalid {}", what)))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(TipError::invalid(format!("invalid {}", what)));
        }
        let canonical = String::from(url);
        if !out.contains(&canonical) {
            out.push(canonical);
        }
    }
    Ok(out)
}

impl NormalizedPost {
    /// BLAKE3 over a length-prefixed encoding of the canonical fields.
    ///
    /// Every variable-length field carries its length so that no two distinct
    /// posts share an encoding (e.g. moving a character between text and link).
    pub fn content_hash(&self) -> ContentHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(CONTENT_HASH_DOMAIN);

        write_field(&mut hasher, self.text.as_bytes());

        hasher.update(&(self.links.len() as u32).to_le_bytes());
        for link in &self.links {
            write_field(&mut hasher, link.as_bytes());
        }

        hasher.update(&(self.images.len() as u32).to_le_bytes());
        for image in &self.images {
            write_field(&mut hasher, image.as_bytes());
        }

        ContentHash::from_digest(hasher.finalize().as_bytes())
    }
}

fn write_field(hasher: &mut blake3::Hasher, bytes: &[u8]) {
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
