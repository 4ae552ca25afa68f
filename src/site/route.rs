// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::config::SiteConfig;
use crate::error::FeedError;
use crate::feed::FeedResolver;
use crate::http::HttpClient;

use super::render::{render_episode, render_not_found};

/// A page produced on demand for a single route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Found { id: String, html: String },
    NotFound { html: String },
}

impl Page {
    pub fn is_found(&self) -> bool {
        matches!(self, Page::Found { .. })
    }

    pub fn html(&self) -> &str {
        match self {
            Page::Found { html, .. } | Page::NotFound { html } => html,
        }
    }
}

/// Generate the page for one route against the live feed.
///
/// Used for routes that were not generated ahead of time. An id the feed
/// does not contain yields the not-found page; only fetch and parse
/// failures are errors.
pub async fn resolve_route<C: HttpClient>(
    resolver: &FeedResolver<C>,
    config: &SiteConfig,
    id: &str,
) -> Result<Page, FeedError> {
    let page = match resolver.resolve_by_id(id).await? {
        Some(episode) => Page::Found {
            id: episode.id.clone(),
            html: render_episode(config, &episode),
        },
        None => Page::NotFound {
            html: render_not_found(config),
        },
    };

    Ok(page)
}
