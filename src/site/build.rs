// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use tracing::{info, warn};

use crate::config::SiteConfig;
use crate::error::SiteError;
use crate::feed::{FeedResolver, FeedSnapshot};
use crate::http::HttpClient;
use crate::manifest::{SiteManifest, read_manifest, write_manifest};
use crate::progress::{BuildEvent, SharedBuildReporter};

use super::render::{render_episode, render_index, render_not_found};

const INDEX_FILENAME: &str = "index.html";
const NOT_FOUND_FILENAME: &str = "404.html";

/// Result of a site generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    /// Pages written, including the index and the not-found page
    pub pages_written: usize,
    /// Episodes in the feed
    pub episodes: usize,
    /// Episode pages deleted because their episode left the feed
    pub pages_removed: usize,
    /// Digest of the feed the pages were generated from
    pub digest: String,
}

struct PendingPage {
    route: String,
    path: PathBuf,
    html: String,
}

/// Fetch the feed once and generate every page into `output_dir`
///
/// This is the main entry point for the library. It:
/// 1. Fetches and parses the feed
/// 2. Writes the index, one page per episode and the not-found page
/// 3. Removes pages of episodes that are no longer in the feed
/// 4. Records the build in the manifest
pub async fn build_site<C: HttpClient>(
    resolver: &FeedResolver<C>,
    config: &SiteConfig,
    output_dir: &Path,
    reporter: &SharedBuildReporter,
) -> Result<BuildResult, SiteError> {
    reporter.report(BuildEvent::FetchingFeed {
        url: resolver.feed_url().to_string(),
    });

    let snapshot = resolver.fetch_snapshot().await?;

    reporter.report(BuildEvent::FeedResolved {
        episodes: snapshot.episodes.len(),
    });

    write_site(
        config,
        resolver.feed_url().as_str(),
        &snapshot,
        output_dir,
        reporter,
    )
    .await
}

/// Generate every page for an already fetched feed
pub async fn write_site(
    config: &SiteConfig,
    feed_url: &str,
    snapshot: &FeedSnapshot,
    output_dir: &Path,
    reporter: &SharedBuildReporter,
) -> Result<BuildResult, SiteError> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| SiteError::CreateDirectoryFailed {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

    let previous = read_manifest(output_dir).await.ok();

    let mut pages = vec![
        PendingPage {
            route: "/".to_string(),
            path: output_dir.join(INDEX_FILENAME),
            html: render_index(config, &snapshot.episodes),
        },
        PendingPage {
            route: "/404".to_string(),
            path: output_dir.join(NOT_FOUND_FILENAME),
            html: render_not_found(config),
        },
    ];

    // Ids are path safe, so the id is the page directory. The first episode
    // with a given id owns the route, matching lookups by id.
    let mut routes = HashSet::new();
    for episode in &snapshot.episodes {
        if !routes.insert(episode.id.as_str()) {
            warn!(episode = %episode.id, "duplicate episode id in feed, keeping the first");
            continue;
        }

        pages.push(PendingPage {
            route: episode.link(),
            path: output_dir.join(&episode.id).join(INDEX_FILENAME),
            html: render_episode(config, episode),
        });
    }

    let writes = pages.into_iter().map(|page| async move {
        write_page(&page).await?;
        reporter.report(BuildEvent::PageWritten {
            route: page.route,
            path: page.path,
        });
        Ok::<_, SiteError>(())
    });
    let pages_written = try_join_all(writes).await?.len();

    let pages_removed = match previous {
        Some(previous) => remove_stale_pages(&previous, &routes, output_dir, reporter).await,
        None => 0,
    };

    // Written last so an interrupted build is never mistaken for a complete one
    let manifest = SiteManifest::from_snapshot(config, feed_url, snapshot);
    write_manifest(&manifest, output_dir).await?;

    reporter.report(BuildEvent::BuildCompleted {
        pages_written,
        episodes: snapshot.episodes.len(),
    });
    info!(
        output = %output_dir.display(),
        pages_written,
        pages_removed,
        "site generated"
    );

    Ok(BuildResult {
        pages_written,
        episodes: snapshot.episodes.len(),
        pages_removed,
        digest: snapshot.digest.clone(),
    })
}

async fn write_page(page: &PendingPage) -> Result<(), SiteError> {
    if let Some(parent) = page.path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| SiteError::CreateDirectoryFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
    }

    tokio::fs::write(&page.path, &page.html)
        .await
        .map_err(|e| SiteError::WritePageFailed {
            path: page.path.clone(),
            source: e,
        })
}

/// Delete the pages of episodes from the previous build that are gone now
async fn remove_stale_pages(
    previous: &SiteManifest,
    routes: &HashSet<&str>,
    output_dir: &Path,
    reporter: &SharedBuildReporter,
) -> usize {
    let mut removed = 0;

    for episode in &previous.episodes {
        if routes.contains(episode.id.as_str()) {
            continue;
        }

        let path = output_dir.join(&episode.id);
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => {
                removed += 1;
                reporter.report(BuildEvent::PageRemoved {
                    route: episode.link(),
                });
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to remove stale episode page");
            }
        }
    }

    removed
}
