// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::SiteConfig;
use crate::error::ManifestError;
use crate::feed::{EpisodeRecord, FeedSnapshot};

pub const MANIFEST_FILENAME: &str = "site.json";

/// Record of the last generation, stored next to the pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteManifest {
    pub feed_url: String,
    /// Digest of the feed bytes the pages were generated from
    pub feed_hash: String,
    /// Digest of the settings and crate version the pages were rendered with
    #[serde(default)]
    pub render_hash: String,
    pub generated_at: String,
    pub episodes: Vec<EpisodeRecord>,
}

impl SiteManifest {
    pub fn from_snapshot(config: &SiteConfig, feed_url: &str, snapshot: &FeedSnapshot) -> Self {
        Self {
            feed_url: feed_url.to_string(),
            feed_hash: snapshot.digest.clone(),
            render_hash: render_digest(config),
            generated_at: Utc::now().to_rfc3339(),
            episodes: snapshot.episodes.clone(),
        }
    }
}

/// Digest of everything besides the feed that shapes the rendered pages.
///
/// Pages built by another release or with other settings must be rebuilt
/// even when the feed has not changed.
pub fn render_digest(config: &SiteConfig) -> String {
    let mut hasher = Sha256::new();
    hasher.update(env!("CARGO_PKG_VERSION").as_bytes());
    hasher.update(b"\0");
    // Serializing plain strings and integers cannot fail
    hasher.update(serde_json::to_vec(config).unwrap_or_default());
    format!("sha256:{:x}", hasher.finalize())
}

/// Write the manifest to the output directory
pub async fn write_manifest(
    manifest: &SiteManifest,
    output_dir: &Path,
) -> Result<(), ManifestError> {
    let path = output_dir.join(MANIFEST_FILENAME);

    let json = serde_json::to_string_pretty(manifest)?;
    tokio::fs::write(&path, json)
        .await
        .map_err(|e| ManifestError::WriteFailed { path, source: e })
}

/// Read the manifest from the output directory
pub async fn read_manifest(output_dir: &Path) -> Result<SiteManifest, ManifestError> {
    let path = output_dir.join(MANIFEST_FILENAME);

    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| ManifestError::ReadFailed {
            path: path.clone(),
            source: e,
        })?;

    serde_json::from_str(&content).map_err(|e| ManifestError::JsonParseFailed { path, source: e })
}
