pub mod config;
pub mod error;
pub mod feed;
pub mod http;
pub mod manifest;
pub mod playback;
pub mod progress;
pub mod revalidate;
pub mod site;

// Re-export main types for convenience
pub use config::SiteConfig;
pub use error::{ConfigError, FeedError, ManifestError, SiteError};
pub use feed::{AudioSource, EpisodeRecord, FeedResolver, FeedSnapshot, find_episode, parse_feed};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use playback::{
    EpisodeControl, MediaBackend, NullBackend, PlaybackCoordinator, PlaybackState,
    PlaybackStatus, Track,
};
pub use progress::{BuildEvent, BuildReporter, NoopReporter, SharedBuildReporter};
pub use revalidate::{RevalidationOutcome, RevalidationSummary, revalidate, revalidate_once};
pub use site::{BuildResult, Page, build_site, resolve_route};
