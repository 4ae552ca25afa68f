mod fetch;
mod parse;
mod resolve;
mod route;

pub use fetch::{feed_digest, fetch_feed_bytes, is_url};
pub use parse::{AudioSource, EpisodeRecord, parse_feed};
pub use resolve::{FeedResolver, FeedSnapshot, find_episode};
pub use route::route_id;

#[cfg(test)]
pub(crate) use resolve::tests::{MockHttpClient, SAMPLE_FEED};
