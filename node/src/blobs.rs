// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Object storage for post payloads, keyed `posts/<content_hash>.json`.

use frog_tips::post::NormalizedPost;
use frog_tips::types::ContentHash;
use opendal::{services, ErrorKind, Operator};

use crate::config::BlobBackend;

#[derive(Clone, Debug)]
pub struct PostArchive {
    op: Operator,
}

impl PostArchive {
    pub fn from_config(backend: &BlobBackend) -> Result<Self, opendal::Error> {
        let op = match backend {
            BlobBackend::Memory => Operator::new(services::Memory::default())?.finish(),
            BlobBackend::Fs { root } => {
                let builder = services::Fs::default().root(&root.to_string_lossy());
                Operator::new(builder)?.finish()
            }
            BlobBackend::S3 {
                bucket,
                region,
                endpoint,
                access_key_id,
                secret_access_key,
            } => {
                let mut builder = services::S3::default().bucket(bucket).region(region);
                if let Some(endpoint) = endpoint {
                    builder = builder.endpoint(endpoint);
                }
                if let Some(key) = access_key_id {
                    builder = builder.access_key_id(key.expose());
                }
                if let Some(secret) = secret_access_key {
                    builder = builder.secret_access_key(secret.expose());
                }
                Operator::new(builder)?.finish()
            }
        };
        Ok(Self { op })
    }

    pub fn memory() -> Result<Self, opendal::Error> {
        Self::from_config(&BlobBackend::Memory)
    }

    pub fn path_for(hash: &ContentHash) -> String {
        format!("posts/{}.json", hash)
    }

    /// Content-addressed, so rewriting an existing key stores identical bytes.
    pub async fn put(&self, hash: &ContentHash, post: &NormalizedPost) -> Result<(), opendal::Error> {
        let bytes = serde_json::to_vec(post)
            .map_err(|e| opendal::Error::new(ErrorKind::Unexpected, e.to_string()))?;
        self.op.write(&Self::path_for(hash), bytes).await?;
        Ok(())
    }

    pub async fn get(&self, hash: &ContentHash) -> Result<Option<NormalizedPost>, opendal::Error> {
        let buffer = match self.op.read(&Self::path_for(hash)).await {
            Ok(buffer) => buffer,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        serde_json::from_slice(&buffer.to_vec())
            .map(Some)
            .map_err(|e| opendal::Error::new(ErrorKind::Unexpected, e.to_string()))
    }

    /// Deleting a missing key is not an error.
    pub async fn delete(&self, hash: &ContentHash) -> Result<(), opendal::Error> {
        self.op.delete(&Self::path_for(hash)).await
    }
}
