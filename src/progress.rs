use std::path::PathBuf;
use std::sync::Arc;

/// Events emitted while generating the site, for progress reporting
#[derive(Debug, Clone)]
pub enum BuildEvent {
    /// Feed is being fetched from URL
    FetchingFeed { url: String },

    /// Feed has been parsed successfully
    FeedResolved { episodes: usize },

    /// Feed content matches the last build; pages were left as they are
    FeedUnchanged { digest: String },

    /// A page was written
    PageWritten {
        /// Route path, `/` for the index
        route: String,
        path: PathBuf,
    },

    /// A page for an episode that left the feed was removed
    PageRemoved { route: String },

    /// Generation finished
    BuildCompleted { pages_written: usize, episodes: usize },

    /// A scheduled regeneration failed; the previous pages stay in place
    RevalidationFailed { error: String },
}

/// Trait for reporting progress events during site generation.
///
/// Implementations can use this to display progress bars, log messages,
/// or collect statistics.
pub trait BuildReporter: Send + Sync {
    /// Report a progress event
    fn report(&self, event: BuildEvent);
}

/// A shared reference to a progress reporter
pub type SharedBuildReporter = Arc<dyn BuildReporter>;

/// A no-op progress reporter that silently ignores all events.
/// Useful for tests or quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl BuildReporter for NoopReporter {
    fn report(&self, _event: BuildEvent) {}
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedBuildReporter {
        Arc::new(Self)
    }
}
