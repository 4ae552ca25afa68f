// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::error::FeedError;
use crate::playback::Track;

use super::route::route_id;

/// A single episode, normalized from a feed item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// Route path segment for the episode page, safe to use as a directory name
    pub id: String,
    pub title: String,
    pub description: String,
    /// Show notes as HTML
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<FixedOffset>>,
    pub audio: AudioSource,
}

/// The playable audio attached to an episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSource {
    pub src: Url,
    pub mime_type: String,
}

impl EpisodeRecord {
    /// Site-relative link to the episode page
    pub fn link(&self) -> String {
        format!("/{}", self.id)
    }

    /// Text up to the first space, which the feed uses as a date label
    pub fn date_label(&self) -> &str {
        self.description
            .split_once(' ')
            .map_or(self.description.as_str(), |(label, _)| label)
    }

    /// Text after the first space, kept as written
    pub fn summary(&self) -> &str {
        self.description
            .split_once(' ')
            .map_or("", |(_, rest)| rest)
    }

    /// Playback metadata for handing this episode to the player
    pub fn track(&self) -> Track {
        Track {
            title: self.title.clone(),
            src: self.audio.src.clone(),
            mime_type: self.audio.mime_type.clone(),
            link: self.link(),
        }
    }
}

/// Parse RSS feed XML bytes into episode records, preserving feed order
///
/// Items without an enclosure or with an unusable enclosure URL are skipped.
pub fn parse_feed(xml_bytes: &[u8]) -> Result<Vec<EpisodeRecord>, FeedError> {
    let channel = rss::Channel::read_from(xml_bytes)?;

    let episodes = channel
        .items()
        .iter()
        .enumerate()
        .filter_map(|(index, item)| parse_episode(index + 1, item))
        .collect();

    Ok(episodes)
}

fn parse_episode(position: usize, item: &rss::Item) -> Option<EpisodeRecord> {
    let id = item
        .guid()
        .and_then(|g| route_id(g.value()))
        .unwrap_or_else(|| position.to_string());

    let item_title = item.title().unwrap_or("Untitled Episode");

    let Some(enclosure) = item.enclosure() else {
        warn!(episode = %id, title = item_title, "skipping feed item without enclosure");
        return None;
    };

    let src = match Url::parse(enclosure.url()) {
        Ok(src) => src,
        Err(e) => {
            warn!(episode = %id, url = enclosure.url(), error = %e, "skipping feed item with invalid enclosure URL");
            return None;
        }
    };

    let published = item.pub_date().and_then(|date_str| {
        DateTime::parse_from_rfc2822(date_str)
            .ok()
            .or_else(|| parse_relaxed_date(date_str))
    });

    let description = item.description().unwrap_or_default().to_string();
    let content = item
        .content()
        .map(String::from)
        .unwrap_or_else(|| description.clone());

    Some(EpisodeRecord {
        title: format!("{}: {}", id, item_title),
        id,
        description,
        content,
        published,
        audio: AudioSource {
            src,
            mime_type: enclosure.mime_type().to_string(),
        },
    })
}

/// Try to parse dates that don't strictly conform to RFC 2822
fn parse_relaxed_date(date_str: &str) -> Option<DateTime<FixedOffset>> {
    let formats = [
        "%a, %d %b %Y %H:%M:%S %z",
        "%Y-%m-%dT%H:%M:%S%:z",
        "%Y-%m-%d %H:%M:%S %z",
    ];

    formats
        .iter()
        .find_map(|format| DateTime::parse_from_str(date_str.trim(), format).ok())
        .or_else(|| DateTime::parse_from_rfc3339(date_str.trim()).ok())
}
