// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use bytes::Bytes;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::FeedError;
use crate::http::HttpClient;

/// Fetch raw feed bytes from a URL (without parsing)
pub async fn fetch_feed_bytes<C: HttpClient + ?Sized>(
    client: &C,
    url: &str,
) -> Result<Bytes, FeedError> {
    let response = client.get(url).await.map_err(|e| FeedError::FetchFailed {
        url: url.to_string(),
        source: e,
    })?;

    if !response.is_success() {
        return Err(FeedError::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    debug!(url, bytes = response.body.len(), "fetched feed");
    Ok(response.body)
}

/// Content digest of raw feed bytes, used to detect unchanged feeds
pub fn feed_digest(bytes: &[u8]) -> String {
    format!("sha256:{:x}", Sha256::digest(bytes))
}

/// Determine if a string is an absolute http(s) URL
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
