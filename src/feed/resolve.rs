// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use tracing::{debug, info};
use url::Url;

use crate::error::FeedError;
use crate::http::HttpClient;

use super::fetch::{feed_digest, fetch_feed_bytes};
use super::parse::{EpisodeRecord, parse_feed};

/// Episode records together with the digest of the feed they came from
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    pub episodes: Vec<EpisodeRecord>,
    pub digest: String,
}

/// Resolves the remote feed into episode records.
///
/// Every call fetches the feed again; nothing is cached between calls, so
/// two resolutions against an unchanged feed yield identical sequences.
#[derive(Debug, Clone)]
pub struct FeedResolver<C> {
    client: C,
    feed_url: Url,
}

impl<C: HttpClient> FeedResolver<C> {
    /// Create a resolver for the given feed URL
    pub fn new(client: C, feed_url: &str) -> Result<Self, FeedError> {
        let feed_url = Url::parse(feed_url)?;
        Ok(Self { client, feed_url })
    }

    pub fn feed_url(&self) -> &Url {
        &self.feed_url
    }

    /// Fetch the feed and return its records along with a content digest
    pub async fn fetch_snapshot(&self) -> Result<FeedSnapshot, FeedError> {
        let bytes = fetch_feed_bytes(&self.client, self.feed_url.as_str()).await?;
        let digest = feed_digest(&bytes);
        let episodes = parse_feed(&bytes)?;

        info!(
            feed = %self.feed_url,
            episodes = episodes.len(),
            "resolved feed"
        );

        Ok(FeedSnapshot { episodes, digest })
    }

    /// All episodes, in feed order
    pub async fn resolve_all(&self) -> Result<Vec<EpisodeRecord>, FeedError> {
        Ok(self.fetch_snapshot().await?.episodes)
    }

    /// The episode with the given id, or `None` when the feed has no such episode
    pub async fn resolve_by_id(&self, id: &str) -> Result<Option<EpisodeRecord>, FeedError> {
        let episodes = self.resolve_all().await?;
        let found = find_episode(&episodes, id).cloned();

        if found.is_none() {
            debug!(episode = id, "episode not found in feed");
        }

        Ok(found)
    }

    /// Route path segments for every episode page, in feed order
    pub async fn route_ids(&self) -> Result<Vec<String>, FeedError> {
        let episodes = self.resolve_all().await?;
        Ok(episodes.into_iter().map(|e| e.id).collect())
    }
}

/// Look up an episode by id in an already fetched list
pub fn find_episode<'a>(episodes: &'a [EpisodeRecord], id: &str) -> Option<&'a EpisodeRecord> {
    episodes.iter().find(|e| e.id == id)
}
