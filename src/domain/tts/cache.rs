//! Content-addressed layout of synthesized audio on disk.
//!
//! Every rendered payload hashes to a key; the key picks a directory
//! `{provider}/{voice}/{key[0..2]}/{key[2..4]}` holding:
//! - `{key}.txt`   the rendered payload, rewritten on every request
//! - `{key}.sln24` the canonical artifact fetched from the provider
//! - `{key}.{ext}` one derived artifact per requested extension
//! - `{key}.{ext}.spec` the output format `{key}.{ext}` was converted to
//!
//! Artifacts are written to a `.part` sibling and renamed into place once
//! complete, so a populated artifact path always holds a finished file.

use crate::infrastructure::audio::AudioSpec;
use std::fmt;
use std::path::{Path, PathBuf};

pub const PAYLOAD_EXTENSION: &str = "txt";
pub const CANONICAL_EXTENSION: &str = "sln24";
pub const PARTIAL_SUFFIX: &str = "part";
pub const SPEC_SUFFIX: &str = "spec";

/// Extensions that would collide with the entry's own bookkeeping files
pub const RESERVED_EXTENSIONS: &[&str] = &[PAYLOAD_EXTENSION, CANONICAL_EXTENSION, PARTIAL_SUFFIX];

/// MD5 hex digest of a rendered payload.
///
/// No normalization happens before hashing: payloads that differ only in
/// whitespace get different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn from_payload(payload: &str) -> Self {
        Self(format!("{:x}", md5::compute(payload.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    root: PathBuf,
    provider: String,
    voice: String,
    key: CacheKey,
}

impl CacheEntry {
    pub fn new(root: &Path, provider: &str, voice: &str, key: CacheKey) -> Self {
        Self {
            root: root.to_path_buf(),
            provider: provider.to_string(),
            voice: voice.to_string(),
            key,
        }
    }

    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    fn shards(&self) -> (&str, &str) {
        let key = self.key.as_str();
        (&key[0..2], &key[2..4])
    }

    /// Cache-relative path of the entry without extension, always `/`-separated
    pub fn sound_path(&self) -> String {
        let (d1, d2) = self.shards();
        format!("{}/{}/{}/{}/{}", self.provider, self.voice, d1, d2, self.key)
    }

    pub fn directory(&self) -> PathBuf {
        let (d1, d2) = self.shards();
        self.root
            .join(&self.provider)
            .join(&self.voice)
            .join(d1)
            .join(d2)
    }

    pub fn artifact(&self, extension: &str) -> PathBuf {
        self.directory().join(format!("{}.{}", self.key, extension))
    }

    pub fn payload_path(&self) -> PathBuf {
        self.artifact(PAYLOAD_EXTENSION)
    }

    pub fn canonical_path(&self) -> PathBuf {
        self.artifact(CANONICAL_EXTENSION)
    }
}

fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

/// Sibling path an artifact is written to before being renamed into place
pub fn partial_path(path: &Path) -> PathBuf {
    suffixed(path, PARTIAL_SUFFIX)
}

/// Sidecar recording the format a derived artifact was produced with
pub fn spec_path(path: &Path) -> PathBuf {
    suffixed(path, SPEC_SUFFIX)
}

/// Format recorded for a derived artifact; None when missing or unreadable
pub async fn read_spec(path: &Path) -> Option<AudioSpec> {
    let raw = tokio::fs::read(spec_path(path)).await.ok()?;
    serde_json::from_slice(&raw).ok()
}

pub async fn write_spec(path: &Path, spec: &AudioSpec) -> std::io::Result<()> {
    tokio::fs::write(spec_path(path), serde_json::to_vec(spec)?).await
}

/// An artifact counts as cached when it exists and is non-empty
pub async fn is_populated(path: &Path) -> bool {
    matches!(tokio::fs::metadata(path).await, Ok(meta) if meta.is_file() && meta.len() > 0)
}

/// Best-effort removal of a leftover partial file
pub async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove partial artifact");
        }
    }
}
