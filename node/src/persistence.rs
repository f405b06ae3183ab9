// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! On-disk snapshots of the in-memory store.
//!
//! Layout: `[MAGIC][VER][META_LEN][META_JSON][BODY][CRC32]`, all integers
//! little-endian, CRC over everything before it.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MAGIC: u32 = 0x474F_5246; // "FROG" read as little-endian bytes
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot too short")]
    Truncated,
    #[error("checksum mismatch: stored {stored:08x}, computed {computed:08x}")]
    ChecksumMismatch { stored: u32, computed: u32 },
    #[error("invalid magic {0:08x}")]
    InvalidMagic(u32),
    #[error("unsupported schema version {0}")]
    UnsupportedVersion(u32),
    #[error("meta claims {claimed} body bytes, found {found}")]
    LengthMismatch { claimed: u64, found: u64 },
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SnapshotMeta {
    pub version: u32,
    pub timestamp: i64,
    pub post_count: u64,
    pub receipt_count: u64,
    pub body_len: u64,
}

pub struct SnapshotManager;

impl SnapshotManager {
    /// Writes to `<path>.tmp`, keeps the previous snapshot as `<path>.prev`,
    /// then renames into place. Returns the number of bytes written.
    pub fn save(path: &Path, meta: &mut SnapshotMeta, body: &[u8]) -> Result<u64, SnapshotError> {
        let tmp_path = path.with_extension("tmp");
        meta.body_len = body.len() as u64;

        let mut written = 0u64;
        {
            let mut file = File::create(&tmp_path)?;
            let mut hasher = Hasher::new();

            let meta_json = serde_json::to_vec(meta)?;
            let meta_len = meta_json.len() as u32;

            let mut write_chunk = |data: &[u8]| -> std::io::Result<()> {
                file.write_all(data)?;
                hasher.update(data);
                written += data.len() as u64;
                Ok(())
            };

            write_chunk(&MAGIC.to_le_bytes())?;
            write_chunk(&SCHEMA_VERSION.to_le_bytes())?;
            write_chunk(&meta_len.to_le_bytes())?;
            write_chunk(&meta_json)?;
            write_chunk(body)?;

            let checksum = hasher.finalize();
            file.write_all(&checksum.to_le_bytes())?;
            file.sync_all()?;
            written += 4;
        }

        if path.exists() {
            let prev = prev_path(path);
            if let Err(e) = std::fs::rename(path, &prev) {
                tracing::warn!(path = %prev.display(), error = %e, "could not keep previous snapshot");
            }
        }

        std::fs::rename(tmp_path, path)?;
        Ok(written)
    }

    pub fn load(path: &Path) -> Result<(SnapshotMeta, Vec<u8>), SnapshotError> {
        let buffer = std::fs::read(path)?;
        Self::parse(&buffer)
    }

    pub fn parse(buffer: &[u8]) -> Result<(SnapshotMeta, Vec<u8>), SnapshotError> {
        if buffer.len() < 16 {
            return Err(SnapshotError::Truncated);
        }

        let (content, trailer) = buffer.split_at(buffer.len() - 4);
        let stored = read_u32(trailer, 0)?;
        let mut hasher = Hasher::new();
        hasher.update(content);
        let computed = hasher.finalize();
        if computed != stored {
            return Err(SnapshotError::ChecksumMismatch { stored, computed });
        }

        let magic = read_u32(content, 0)?;
        if magic != MAGIC {
            return Err(SnapshotError::InvalidMagic(magic));
        }
        let version = read_u32(content, 4)?;
        if version != SCHEMA_VERSION {
            return Err(SnapshotError::UnsupportedVersion(version));
        }

        let meta_len = read_u32(content, 8)? as usize;
        let meta_end = 12 + meta_len;
        let meta_bytes = content.get(12..meta_end).ok_or(SnapshotError::Truncated)?;
        let meta: SnapshotMeta = serde_json::from_slice(meta_bytes)?;

        let body = &content[meta_end..];
        if body.len() as u64 != meta.body_len {
            return Err(SnapshotError::LengthMismatch {
                claimed: meta.body_len,
                found: body.len() as u64,
            });
        }

        Ok((meta, body.to_vec()))
    }
}

pub fn prev_path(path: &Path) -> PathBuf {
    path.with_extension("prev")
}

fn read_u32(buf: &[u8], at: usize) -> Result<u32, SnapshotError> {
    let bytes: [u8; 4] = buf
        .get(at..at + 4)
        .and_then(|s| s.try_into().ok())
        .ok_or(SnapshotError::Truncated)?;
    Ok(u32::from_le_bytes(bytes))
}
