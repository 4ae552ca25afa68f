// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::future::Future;
use std::path::Path;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, warn};

use crate::config::SiteConfig;
use crate::error::SiteError;
use crate::feed::FeedResolver;
use crate::http::HttpClient;
use crate::manifest::{read_manifest, render_digest};
use crate::progress::{BuildEvent, SharedBuildReporter};
use crate::site::{BuildResult, write_site};

/// What a single revalidation pass did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevalidationOutcome {
    /// The feed changed (or there was no previous build) and pages were regenerated
    Rebuilt(BuildResult),
    /// The feed and the render settings matched the last build
    Unchanged,
}

/// Counts of what a revalidation loop did before it was stopped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevalidationSummary {
    pub rebuilds: usize,
    pub unchanged: usize,
    pub failures: usize,
}

/// Fetch the feed and regenerate the site only if the feed or the render
/// settings differ from the last build
pub async fn revalidate_once<C: HttpClient>(
    resolver: &FeedResolver<C>,
    config: &SiteConfig,
    output_dir: &Path,
    reporter: &SharedBuildReporter,
) -> Result<RevalidationOutcome, SiteError> {
    let previous = read_manifest(output_dir).await.ok();

    reporter.report(BuildEvent::FetchingFeed {
        url: resolver.feed_url().to_string(),
    });
    let snapshot = resolver.fetch_snapshot().await?;

    let up_to_date = previous.is_some_and(|manifest| {
        manifest.feed_hash == snapshot.digest && manifest.render_hash == render_digest(config)
    });
    if up_to_date {
        debug!(digest = %snapshot.digest, "feed unchanged, keeping pages");
        reporter.report(BuildEvent::FeedUnchanged {
            digest: snapshot.digest,
        });
        return Ok(RevalidationOutcome::Unchanged);
    }

    reporter.report(BuildEvent::FeedResolved {
        episodes: snapshot.episodes.len(),
    });
    let result = write_site(
        config,
        resolver.feed_url().as_str(),
        &snapshot,
        output_dir,
        reporter,
    )
    .await?;

    Ok(RevalidationOutcome::Rebuilt(result))
}

/// Revalidate every `config.revalidate_secs` until `shutdown` completes.
///
/// The first pass runs immediately. A failed pass is logged and reported;
/// the pages from the last successful pass stay in place. An invalid
/// configuration is rejected before any pass runs.
pub async fn revalidate<C, F>(
    resolver: &FeedResolver<C>,
    config: &SiteConfig,
    output_dir: &Path,
    reporter: &SharedBuildReporter,
    shutdown: F,
) -> Result<RevalidationSummary, SiteError>
where
    C: HttpClient,
    F: Future<Output = ()>,
{
    config.validate()?;

    let mut summary = RevalidationSummary::default();
    let mut ticker = interval(config.revalidate_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                match revalidate_once(resolver, config, output_dir, reporter).await {
                    Ok(RevalidationOutcome::Rebuilt(_)) => summary.rebuilds += 1,
                    Ok(RevalidationOutcome::Unchanged) => summary.unchanged += 1,
                    Err(e) => {
                        warn!(error = %e, "revalidation failed");
                        reporter.report(BuildEvent::RevalidationFailed {
                            error: e.to_string(),
                        });
                        summary.failures += 1;
                    }
                }
            }
        }
    }

    Ok(summary)
}
