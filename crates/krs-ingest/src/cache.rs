//! Content-keyed memoization of parsed uploads.
//!
//! Parsing is a pure function of the upload bytes and format, so the parsed
//! table is cached under the SHA-256 of those bytes. There is no invalidation:
//! a changed upload simply has a different key. Failed parses are not cached.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use polars::prelude::DataFrame;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::format::UploadFormat;
use crate::loader::{load_table_from_bytes, read_bytes};

/// Cache key: content digest plus the format the bytes were read as.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    digest: String,
    format: UploadFormat,
}

impl CacheKey {
    pub fn new(bytes: &[u8], format: UploadFormat) -> Self {
        let digest = Sha256::digest(bytes);
        Self {
            digest: hex::encode(digest),
            format,
        }
    }

    /// Hex-encoded SHA-256 of the upload bytes.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn format(&self) -> UploadFormat {
        self.format
    }
}

/// Read-through cache of parsed uploads for one session.
#[derive(Debug, Default)]
pub struct UploadCache {
    entries: HashMap<CacheKey, Arc<DataFrame>>,
    hits: usize,
    misses: usize,
}

impl UploadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached table for these bytes, parsing them on first use.
    pub fn get_or_parse(
        &mut self,
        bytes: Vec<u8>,
        format: UploadFormat,
        source_name: &str,
    ) -> Result<Arc<DataFrame>> {
        let key = CacheKey::new(&bytes, format);
        if let Some(table) = self.entries.get(&key) {
            self.hits += 1;
            tracing::debug!(source = source_name, digest = key.digest(), "upload cache hit");
            return Ok(Arc::clone(table));
        }

        self.misses += 1;
        let table = Arc::new(load_table_from_bytes(bytes, format, source_name)?);
        tracing::debug!(source = source_name, digest = key.digest(), "upload cache miss");
        self.entries.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// Reads an upload from disk and resolves it through the cache.
    pub fn load_path(&mut self, path: &Path) -> Result<Arc<DataFrame>> {
        let format = UploadFormat::from_path(path)?;
        let bytes = read_bytes(path)?;
        self.get_or_parse(bytes, format, &path.display().to_string())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}
