mod backend;
mod control;
mod coordinator;
mod state;

pub use backend::{MediaBackend, NullBackend};
pub use control::EpisodeControl;
pub use coordinator::PlaybackCoordinator;
pub use state::{PlaybackState, PlaybackStatus, Track};
